//! Socket lifecycle: connect with a deadline, read lines, write frames, tear down

use std::future::Future;
use std::io;
use std::sync::Arc;
use std::time::Duration;

use lwcp_parser::LineParser;
use parking_lot::Mutex;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncReadExt, AsyncWriteExt, BufReader};
use tokio::net::tcp::{OwnedReadHalf, OwnedWriteHalf};
use tokio::net::TcpStream;
use tokio::sync::{broadcast, MutexGuard};
use tokio::task::JoinHandle;
use tracing::{debug, error, info, trace, warn};

use crate::dispatch::{dispatch, Core};
use crate::error::{ClientError, Result};
use crate::event::ClientEvent;
use crate::logging::{WIRE_INPUT, WIRE_OUTPUT};
use crate::session::ConnectionState;

/// Longest inbound line accepted; longer lines are discarded unread
pub(crate) const MAX_LINE: usize = 64 * 1024;

/// Socket write half, held locked for the span of one request
pub(crate) type Writer<'a> = MutexGuard<'a, Option<OwnedWriteHalf>>;

/// Outcome of reading one inbound frame
#[derive(Debug, PartialEq)]
pub(crate) enum Frame {
    Line,
    Oversized,
    Closed,
}

/// State shared between the client handles and the reader task
pub(crate) struct Shared {
    pub core: Mutex<Core>,
    pub events: broadcast::Sender<ClientEvent>,
    parser: Arc<dyn LineParser>,
    writer: tokio::sync::Mutex<Option<OwnedWriteHalf>>,
    reader: Mutex<Option<JoinHandle<()>>>,
}

impl Shared {
    pub fn new(parser: Arc<dyn LineParser>, event_capacity: usize) -> Self {
        let (events, _) = broadcast::channel(event_capacity);
        Self {
            core: Mutex::new(Core::default()),
            events,
            parser,
            writer: tokio::sync::Mutex::new(None),
            reader: Mutex::new(None),
        }
    }

    /// Open the socket and start the reader task
    pub async fn connect(self: &Arc<Self>, host: &str, port: u16, limit: Duration) -> Result<()> {
        debug!("Connecting to {}:{}", host, port);
        self.connect_with(TcpStream::connect((host, port)), limit).await?;
        info!("Connected to {}:{}", host, port);
        Ok(())
    }

    /// Drive `connect` under the deadline; any failure leaves the session disconnected
    pub(crate) async fn connect_with<F>(self: &Arc<Self>, connect: F, limit: Duration) -> Result<()>
    where
        F: Future<Output = io::Result<TcpStream>>,
    {
        {
            let mut core = self.core.lock();
            if core.session.state != ConnectionState::Disconnected {
                return Err(ClientError::AlreadyConnected);
            }
            core.session.state = ConnectionState::Connecting;
        }

        let stream = match connect_within(limit, connect).await {
            Ok(stream) => stream,
            Err(e) => {
                self.core.lock().session.state = ConnectionState::Disconnected;
                return Err(e);
            }
        };
        if let Err(e) = stream.set_nodelay(true) {
            warn!("Failed to disable Nagle on the control socket: {}", e);
        }

        let (read_half, write_half) = stream.into_split();
        *self.writer.lock().await = Some(write_half);
        self.core.lock().session.state = ConnectionState::Connected;

        let shared = Arc::clone(self);
        *self.reader.lock() = Some(tokio::spawn(async move { shared.read_loop(read_half).await }));
        Ok(())
    }

    /// Exclusive access to the socket for writing
    pub async fn lock_writer(&self) -> Writer<'_> {
        self.writer.lock().await
    }

    /// Close the socket on request
    pub async fn disconnect(&self) {
        if let Some(reader) = self.reader.lock().take() {
            reader.abort();
        }
        if let Some(mut writer) = self.writer.lock().await.take() {
            let _ = writer.shutdown().await;
        }
        self.teardown();
    }

    async fn read_loop(self: Arc<Self>, read_half: OwnedReadHalf) {
        let mut reader = BufReader::new(read_half);
        let mut buf = Vec::new();
        loop {
            match read_frame(&mut reader, &mut buf, MAX_LINE).await {
                Ok(Frame::Line) => {
                    let line = String::from_utf8_lossy(&buf);
                    self.on_line(line.trim_end_matches(|c: char| c == '\r' || c == '\n'));
                }
                Ok(Frame::Oversized) => warn!("Dropping inbound line longer than {} bytes", MAX_LINE),
                Ok(Frame::Closed) => {
                    info!("The server closed the connection");
                    break;
                }
                Err(e) => {
                    error!("Socket error: {}", e);
                    let _ = self.events.send(ClientEvent::SocketError { message: e.to_string() });
                    break;
                }
            }
        }
        self.writer.lock().await.take();
        self.reader.lock().take();
        self.teardown();
    }

    /// Handle one received line
    pub fn on_line(&self, line: &str) {
        if line.is_empty() {
            return;
        }
        trace!(target: WIRE_INPUT, "{}", line);
        let Some(msg) = self.parser.parse_line(line) else {
            debug!("Dropping unparseable line: {}", line);
            return;
        };
        let events = dispatch(&mut self.core.lock(), msg);
        for event in events {
            // no receivers is not an error
            let _ = self.events.send(event);
        }
    }

    /// Reset the session and release every waiter
    fn teardown(&self) {
        let (was_connected, released) = {
            let mut core = self.core.lock();
            let was_connected = core.session.state != ConnectionState::Disconnected;
            core.session.reset();
            (was_connected, core.correlator.fail_all())
        };
        if released > 0 {
            warn!("Connection closed with {} request(s) still waiting for a reply", released);
        }
        if was_connected {
            let _ = self.events.send(ClientEvent::Disconnected);
        }
    }
}

/// Write one frame followed by a newline on an already locked socket
pub(crate) async fn send_frame(writer: &mut Option<OwnedWriteHalf>, frame: &str) -> Result<()> {
    let socket = writer.as_mut().ok_or(ClientError::NotConnected)?;
    let mut bytes = Vec::with_capacity(frame.len() + 1);
    bytes.extend_from_slice(frame.as_bytes());
    bytes.push(b'\n');
    socket.write_all(&bytes).await?;
    trace!(target: WIRE_OUTPUT, "{}", frame);
    Ok(())
}

/// Read one newline-terminated frame into `buf`, never buffering more than `limit` bytes
///
/// A line reaching `limit` without a newline is skipped up to its newline.
pub(crate) async fn read_frame<R>(reader: &mut R, buf: &mut Vec<u8>, limit: usize) -> io::Result<Frame>
where
    R: AsyncBufRead + Unpin,
{
    buf.clear();
    let read = (&mut *reader).take(limit as u64).read_until(b'\n', buf).await?;
    if read == 0 {
        return Ok(Frame::Closed);
    }
    if buf.last() == Some(&b'\n') || read < limit {
        return Ok(Frame::Line);
    }
    loop {
        buf.clear();
        let read = (&mut *reader).take(limit as u64).read_until(b'\n', buf).await?;
        if read == 0 || buf.last() == Some(&b'\n') {
            break;
        }
    }
    buf.clear();
    Ok(Frame::Oversized)
}

/// Run `connect` under a deadline; on expiry the attempt is dropped, closing the socket
pub(crate) async fn connect_within<T, F>(limit: Duration, connect: F) -> Result<T>
where
    F: Future<Output = io::Result<T>>,
{
    match tokio::time::timeout(limit, connect).await {
        Ok(Ok(stream)) => Ok(stream),
        Ok(Err(e)) => {
            error!("Failed to connect to the server: {}", e);
            Err(ClientError::Io(e))
        }
        Err(_) => {
            error!("Failed to connect to the server within {:?}", limit);
            Err(ClientError::ConnectTimeout(limit))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lwcp_parser::LwcpParser;
    use tokio::time::Instant;

    #[tokio::test(start_paused = true)]
    async fn test_connect_times_out_after_limit() {
        let start = Instant::now();
        let result = connect_within(Duration::from_secs(5), std::future::pending::<io::Result<()>>()).await;

        assert!(matches!(result, Err(ClientError::ConnectTimeout(limit)) if limit == Duration::from_secs(5)));
        let elapsed = start.elapsed();
        assert!(elapsed >= Duration::from_millis(5000) && elapsed < Duration::from_millis(5001));
    }

    #[tokio::test(start_paused = true)]
    async fn test_connect_before_limit_succeeds() {
        let result = connect_within(Duration::from_secs(5), async {
            tokio::time::sleep(Duration::from_millis(4999)).await;
            Ok::<_, io::Error>(7)
        })
        .await;
        assert_eq!(result.unwrap(), 7);
    }

    #[tokio::test(start_paused = true)]
    async fn test_timed_out_connect_can_be_retried() {
        let shared = Arc::new(Shared::new(Arc::new(LwcpParser), 8));
        let limit = Duration::from_secs(5);

        for _ in 0..2 {
            let result = shared.connect_with(std::future::pending::<io::Result<TcpStream>>(), limit).await;
            assert!(matches!(result, Err(ClientError::ConnectTimeout(_))));
            assert_eq!(shared.core.lock().session.state, ConnectionState::Disconnected);
        }
    }

    #[tokio::test]
    async fn test_failed_connect_can_be_retried() {
        let shared = Arc::new(Shared::new(Arc::new(LwcpParser), 8));
        let refused = async { Err::<TcpStream, _>(io::Error::from(io::ErrorKind::ConnectionRefused)) };

        let result = shared.connect_with(refused, Duration::from_secs(5)).await;
        assert!(matches!(result, Err(ClientError::Io(_))));
        assert_eq!(shared.core.lock().session.state, ConnectionState::Disconnected);

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        shared.connect_with(TcpStream::connect(addr), Duration::from_secs(5)).await.unwrap();
        assert_eq!(shared.core.lock().session.state, ConnectionState::Connected);
    }

    #[tokio::test]
    async fn test_unparseable_lines_are_dropped() {
        let shared = Shared::new(Arc::new(LwcpParser), 8);
        let mut events = shared.events.subscribe();

        shared.on_line("");
        shared.on_line("%%% not lwcp");
        shared.on_line("pong");

        assert_eq!(events.try_recv().unwrap(), ClientEvent::Pong);
        assert!(events.try_recv().is_err());
    }

    #[tokio::test]
    async fn test_oversized_lines_are_skipped() {
        let mut input: &[u8] = b"ok\nxxxxxxxxxxxxxxxxxxxx\nnext\ntail";
        let mut buf = Vec::new();

        assert_eq!(read_frame(&mut input, &mut buf, 8).await.unwrap(), Frame::Line);
        assert_eq!(buf, b"ok\n");
        assert_eq!(read_frame(&mut input, &mut buf, 8).await.unwrap(), Frame::Oversized);
        assert!(buf.is_empty());
        assert_eq!(read_frame(&mut input, &mut buf, 8).await.unwrap(), Frame::Line);
        assert_eq!(buf, b"next\n");
        assert_eq!(read_frame(&mut input, &mut buf, 8).await.unwrap(), Frame::Line);
        assert_eq!(buf, b"tail");
        assert_eq!(read_frame(&mut input, &mut buf, 8).await.unwrap(), Frame::Closed);
    }

    #[tokio::test]
    async fn test_unterminated_flood_is_dropped() {
        let flood = vec![b'x'; 10 * 8];
        let mut input: &[u8] = &flood;
        let mut buf = Vec::new();

        assert_eq!(read_frame(&mut input, &mut buf, 8).await.unwrap(), Frame::Oversized);
        assert!(buf.capacity() < flood.len());
        assert_eq!(read_frame(&mut input, &mut buf, 8).await.unwrap(), Frame::Closed);
    }

    #[tokio::test]
    async fn test_write_without_socket_is_not_connected() {
        let shared = Shared::new(Arc::new(LwcpParser), 8);
        let mut writer = shared.lock_writer().await;
        assert!(matches!(send_frame(&mut writer, "ping cc").await, Err(ClientError::NotConnected)));
    }
}
