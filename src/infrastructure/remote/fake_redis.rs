//! Minimal in-process RESP responder for pool and store tests.
//!
//! Understands `PING` and `GET`; every other command (e.g. the client's
//! `CLIENT SETINFO` handshake) is answered with `+OK`.

use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

use parking_lot::Mutex;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncReadExt, AsyncWriteExt, BufReader};
use tokio::net::{TcpListener, TcpStream};
use tokio::task::JoinHandle;

#[derive(Clone)]
enum Stored {
    Bytes(Vec<u8>),
    WrongType,
    /// `GET` never gets a reply.
    Stall,
}

#[derive(Default)]
struct Shared {
    values: Mutex<HashMap<String, Stored>>,
    accepted: AtomicUsize,
    fail_ping: AtomicBool,
}

pub(crate) struct FakeRedis {
    addr: SocketAddr,
    shared: Arc<Shared>,
    task: JoinHandle<()>,
}

impl FakeRedis {
    pub(crate) async fn start() -> Self {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let shared = Arc::new(Shared::default());

        let accept_shared = shared.clone();
        let task = tokio::spawn(async move {
            while let Ok((stream, _)) = listener.accept().await {
                accept_shared.accepted.fetch_add(1, Ordering::SeqCst);
                tokio::spawn(serve(stream, accept_shared.clone()));
            }
        });

        Self { addr, shared, task }
    }

    pub(crate) fn url(&self) -> String {
        format!("redis://{}/", self.addr)
    }

    pub(crate) fn put(&self, key: &str, value: impl Into<Vec<u8>>) {
        self.insert(key, Stored::Bytes(value.into()));
    }

    pub(crate) fn put_wrong_type(&self, key: &str) {
        self.insert(key, Stored::WrongType);
    }

    pub(crate) fn stall_on(&self, key: &str) {
        self.insert(key, Stored::Stall);
    }

    pub(crate) fn set_fail_ping(&self, fail: bool) {
        self.shared.fail_ping.store(fail, Ordering::SeqCst);
    }

    /// Number of TCP connections accepted so far.
    pub(crate) fn accepted(&self) -> usize {
        self.shared.accepted.load(Ordering::SeqCst)
    }

    fn insert(&self, key: &str, value: Stored) {
        self.shared.values.lock().insert(key.to_string(), value);
    }
}

impl Drop for FakeRedis {
    fn drop(&mut self) {
        self.task.abort();
    }
}

async fn serve(stream: TcpStream, shared: Arc<Shared>) {
    let (read_half, mut write_half) = stream.into_split();
    let mut reader = BufReader::new(read_half);

    while let Some(command) = read_command(&mut reader).await {
        let name = command
            .first()
            .map(|c| String::from_utf8_lossy(c).to_ascii_uppercase())
            .unwrap_or_default();

        let reply: Vec<u8> = match name.as_str() {
            "PING" if shared.fail_ping.load(Ordering::SeqCst) => b"-ERR ping refused\r\n".to_vec(),
            "PING" => b"+PONG\r\n".to_vec(),
            "GET" => {
                let key = command
                    .get(1)
                    .map(|k| String::from_utf8_lossy(k).into_owned())
                    .unwrap_or_default();
                let stored = shared.values.lock().get(&key).cloned();
                match stored {
                    Some(Stored::Bytes(bytes)) => bulk(&bytes),
                    Some(Stored::WrongType) => {
                        b"-WRONGTYPE Operation against a key holding the wrong kind of value\r\n"
                            .to_vec()
                    }
                    Some(Stored::Stall) => {
                        std::future::pending::<()>().await;
                        return;
                    }
                    None => b"$-1\r\n".to_vec(),
                }
            }
            _ => b"+OK\r\n".to_vec(),
        };

        if write_half.write_all(&reply).await.is_err() {
            return;
        }
    }
}

/// Reads one `*N` array of bulk strings; `None` on EOF or malformed input.
async fn read_command<R>(reader: &mut R) -> Option<Vec<Vec<u8>>>
where
    R: AsyncBufRead + Unpin,
{
    let count: usize = read_header(reader, '*').await?;
    let mut args = Vec::with_capacity(count);
    for _ in 0..count {
        let len: usize = read_header(reader, '$').await?;
        let mut arg = vec![0; len + 2];
        reader.read_exact(&mut arg).await.ok()?;
        arg.truncate(len);
        args.push(arg);
    }
    Some(args)
}

async fn read_header<R>(reader: &mut R, marker: char) -> Option<usize>
where
    R: AsyncBufRead + Unpin,
{
    let mut line = String::new();
    if reader.read_line(&mut line).await.ok()? == 0 {
        return None;
    }
    line.trim_end().strip_prefix(marker)?.parse().ok()
}

fn bulk(bytes: &[u8]) -> Vec<u8> {
    let mut out = format!("${}\r\n", bytes.len()).into_bytes();
    out.extend_from_slice(bytes);
    out.extend_from_slice(b"\r\n");
    out
}
