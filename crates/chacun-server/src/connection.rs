//! One WebSocket connection: handshake, read loop and writer task

use crate::channel::{ChannelId, Outbound, WebSocketChannel};
use crate::config::ConnectionLimits;
use crate::error::{Error, Result};
use crate::handler::WebSocketHandler;
use chacun_wire::{frame, handshake, CloseStatusCode, Message, MessageAssembler, OpCode, Parsed};
use std::net::SocketAddr;
use std::time::Duration;
use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt};
use tokio::net::TcpStream;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

const READ_CHUNK: usize = 4096;

/// How long the writer may take to flush the close frame
const CLOSE_TIMEOUT: Duration = Duration::from_secs(5);

/// Read the upgrade request and answer it
///
/// Returns the bytes received after the request head, which already
/// belong to the frame stream.
pub async fn accept_handshake<S>(stream: &mut S, max_size: usize) -> Result<Vec<u8>>
where
    S: AsyncRead + AsyncWrite + Unpin,
{
    let mut buf = Vec::with_capacity(1024);
    let mut chunk = [0u8; 1024];
    let head_len = loop {
        if let Some(len) = handshake::header_len(&buf) {
            break len;
        }
        if buf.len() > max_size {
            return Err(Error::HandshakeTooLarge(max_size));
        }
        let read = stream.read(&mut chunk).await?;
        if read == 0 {
            return Err(Error::HandshakeIncomplete);
        }
        buf.extend_from_slice(&chunk[..read]);
    };
    if head_len > max_size {
        return Err(Error::HandshakeTooLarge(max_size));
    }

    let request = String::from_utf8_lossy(&buf[..head_len]);
    if !handshake::is_upgrade_request(&request) {
        return Err(Error::NotAnUpgrade);
    }
    let response = handshake::upgrade_response(&request)?;
    stream.write_all(response.as_bytes()).await?;
    Ok(buf.split_off(head_len))
}

/// Serve a connection until it closes
///
/// The socket is dropped without a response when the handshake fails;
/// the handler is not called in that case.
pub async fn serve_connection<H: WebSocketHandler>(
    mut stream: TcpStream,
    peer: SocketAddr,
    id: ChannelId,
    handler: &H,
    limits: ConnectionLimits,
) -> Result<()> {
    let leftover = accept_handshake(&mut stream, limits.max_handshake_size).await?;
    tracing::debug!(channel = %id, %peer, "handshake completed");

    let (reader, writer) = stream.into_split();
    let outcome = serve_frames(reader, writer, leftover, peer, id, handler, limits.max_message_size).await;
    tracing::debug!(channel = %id, %peer, "connection closed");
    outcome
}

/// Why the read loop stopped
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ReadEnd {
    /// The peer closed or sent a close frame
    Peer,
    /// The writer task finished, after a close or a terminate
    Writer,
}

/// Run the frame loop of an upgraded connection
///
/// Handler callbacks always run to completion. Only the wait for more
/// bytes is interrupted when the writer stops.
async fn serve_frames<R, W, H>(
    mut reader: R,
    writer: W,
    leftover: Vec<u8>,
    peer: SocketAddr,
    id: ChannelId,
    handler: &H,
    max_message_size: usize,
) -> Result<()>
where
    R: AsyncRead + Unpin,
    W: AsyncWrite + Unpin + Send + 'static,
    H: WebSocketHandler,
{
    let (sender, receiver) = mpsc::unbounded_channel();
    let channel = WebSocketChannel::new(id, peer, sender);
    let mut writer_task = tokio::spawn(write_outbound(writer, receiver));

    handler.on_open(&channel).await;
    let outcome = read_frames(
        &mut reader,
        leftover,
        &channel,
        handler,
        max_message_size,
        &mut writer_task,
    )
    .await;
    if let Err(err) = &outcome {
        tracing::debug!(channel = %id, %peer, "connection failed: {err}");
        if let Error::Wire(wire) = err {
            channel.close(wire.close_code(), &wire.to_string());
        }
    }
    handler.on_close(&channel).await;

    if !matches!(outcome, Ok(ReadEnd::Writer)) {
        // The handle only stops the writer once every clone is dropped.
        channel.terminate();
        if tokio::time::timeout(CLOSE_TIMEOUT, &mut writer_task).await.is_err() {
            writer_task.abort();
        }
    }
    match outcome {
        Err(Error::Io(_)) | Ok(_) => Ok(()),
        Err(err) => Err(err),
    }
}

async fn read_frames<R, H>(
    reader: &mut R,
    mut buf: Vec<u8>,
    channel: &WebSocketChannel,
    handler: &H,
    max_message_size: usize,
    writer_task: &mut JoinHandle<Result<()>>,
) -> Result<ReadEnd>
where
    R: AsyncRead + Unpin,
    H: WebSocketHandler,
{
    let mut assembler = MessageAssembler::new(max_message_size);
    let mut chunk = vec![0u8; READ_CHUNK];
    loop {
        while let Parsed::Complete { frame, consumed } = frame::parse_frame(&buf, max_message_size)? {
            buf.drain(..consumed);
            match frame.opcode {
                OpCode::Ping => handler.on_ping(channel, frame.payload).await,
                OpCode::Pong => handler.on_pong(channel, frame.payload).await,
                OpCode::Close => {
                    let code = frame
                        .close_reason()?
                        .map_or(CloseStatusCode::NormalClosure.as_u16(), |(code, _)| code);
                    tracing::debug!(channel = %channel.id(), code, "close received");
                    channel.close_raw(code, "");
                    return Ok(ReadEnd::Peer);
                }
                _ => match assembler.push(frame)? {
                    Some(Message::Text(text)) => handler.on_message(channel, text).await,
                    Some(Message::Binary(data)) => handler.on_binary(channel, data).await,
                    None => {}
                },
            }
        }
        let read = tokio::select! {
            read = reader.read(&mut chunk) => read?,
            _ = &mut *writer_task => return Ok(ReadEnd::Writer),
        };
        if read == 0 {
            return Ok(ReadEnd::Peer);
        }
        buf.extend_from_slice(&chunk[..read]);
    }
}

async fn write_outbound<W: AsyncWrite + Unpin>(
    mut writer: W,
    mut outbound: mpsc::UnboundedReceiver<Outbound>,
) -> Result<()> {
    while let Some(message) = outbound.recv().await {
        let bytes = match message {
            Outbound::Text(text) => frame::encode_text(&text),
            Outbound::Ping => frame::PING.to_vec(),
            Outbound::Pong(payload) => frame::encode_pong(&payload),
            Outbound::Close(code, reason) => {
                writer.write_all(&frame::encode_close_raw(code, &reason)).await?;
                writer.shutdown().await?;
                return Ok(());
            }
            Outbound::Terminate => return Ok(()),
        };
        writer.write_all(&bytes).await?;
    }
    Ok(())
}
