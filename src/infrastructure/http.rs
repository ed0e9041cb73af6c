use std::time::Instant;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use bytes::Bytes;
use http_body_util::{BodyExt, Empty};
use hyper::client::conn::http2;
use hyper_util::rt::{TokioExecutor, TokioIo};
use crate::domain::{HttpSummary, ResptimeError};
use crate::ports::{HttpClient, HttpResponse, ResponseHeaders, BoxedIoStream};

const HEADER_LIMIT: usize = 64 * 1024;
const READ_CHUNK: usize = 16 * 1024;
const USER_AGENT: &str = concat!("resptime/", env!("CARGO_PKG_VERSION"));

pub struct HybridHttpClient;

impl HybridHttpClient {
    pub fn new() -> Self { Self }
}

impl Default for HybridHttpClient {
    fn default() -> Self { Self::new() }
}

/// How the end of an HTTP/1.x body is recognised.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum BodyFraming {
    Empty,
    Length(u64),
    Chunked,
    UntilClose,
}

impl HttpClient for HybridHttpClient {
    async fn request_h1(&self, mut stream: BoxedIoStream, authority: &str, path: &str) -> Result<HttpResponse, ResptimeError> {
        let request = format!(
            "GET {} HTTP/1.1\r\nHost: {}\r\nConnection: close\r\nUser-Agent: {}\r\nAccept: */*\r\n\r\n",
            path, authority, USER_AGENT
        );
        stream.write_all(request.as_bytes()).await.map_err(|e| ResptimeError::http(format!("failed to send request: {}", e)))?;
        stream.flush().await.map_err(|e| ResptimeError::http(format!("failed to send request: {}", e)))?;

        let mut chunk = vec![0u8; READ_CHUNK];
        let mut head: Vec<u8> = Vec::new();
        let mut first_byte_at: Option<Instant> = None;
        let mut parsed: Option<(HttpSummary, ResponseHeaders, BodyReader)> = None;

        loop {
            let n = match stream.read(&mut chunk).await {
                Ok(n) => n,
                // Servers often drop TLS without close_notify once the body is sent.
                Err(e) if e.kind() == std::io::ErrorKind::UnexpectedEof && parsed.is_some() => 0,
                Err(e) => return Err(ResptimeError::http(format!("failed to read response: {}", e))),
            };
            if n == 0 { break; }
            if first_byte_at.is_none() { first_byte_at = Some(Instant::now()); }
            let data = &chunk[..n];

            let body_part: &[u8] = if parsed.is_some() {
                data
            } else {
                head.extend_from_slice(data);
                match parse_response_with_1xx_skip(&head)? {
                    Some((summary, headers, body_start)) => {
                        let reader = BodyReader::new(body_framing(summary.status, &headers));
                        parsed = Some((summary, headers, reader));
                        // The head terminator always ends inside the latest read.
                        let consumed = head.len() - body_start;
                        &data[n - consumed..]
                    }
                    None => {
                        if head.len() > HEADER_LIMIT {
                            return Err(ResptimeError::http("response headers too large"));
                        }
                        continue;
                    }
                }
            };

            if let Some((_, _, body)) = parsed.as_mut() {
                body.feed(body_part)?;
                if body.is_complete() { break; }
            }
        }

        let (summary, headers, body) = parsed.ok_or_else(|| {
            if head.is_empty() {
                ResptimeError::http("server closed the connection without a response")
            } else {
                ResptimeError::http("incomplete HTTP response")
            }
        })?;
        let body_bytes = body.received();

        Ok(HttpResponse { summary, headers, first_byte_at, body_bytes })
    }

    async fn request_h2(&self, stream: BoxedIoStream, authority: &str, path: &str) -> Result<HttpResponse, ResptimeError> {
        let uri = format!("https://{}{}", authority, path);

        let (mut sender, conn) = http2::handshake(TokioExecutor::new(), TokioIo::new(stream)).await
            .map_err(|e| ResptimeError::http(format!("h2 handshake failed: {}", e)))?;

        tokio::spawn(async move {
            if let Err(e) = conn.await {
                tracing::debug!(error = %e, "h2 connection ended with error");
            }
        });

        let req = hyper::Request::builder()
            .method("GET")
            .uri(&uri)
            .header("user-agent", USER_AGENT)
            .header("accept", "*/*")
            .body(Empty::<Bytes>::new())
            .map_err(|e| ResptimeError::http(format!("failed to build request: {}", e)))?;

        let res = sender.send_request(req).await
            .map_err(|e| ResptimeError::http(format!("h2 request failed: {}", e)))?;

        // The HEADERS frame is the first thing the server sends back.
        let first_byte_at = Some(Instant::now());

        let status = res.status().as_u16();
        let reason = res.status().canonical_reason().map(|s| s.to_string());

        let mut headers = ResponseHeaders::default();
        for (key, value) in res.headers() {
            let val_str = value.to_str().unwrap_or("");
            match key.as_str() {
                "location" => headers.location = Some(val_str.to_string()),
                "content-length" => headers.content_length = val_str.parse().ok(),
                _ => {}
            }
        }

        let mut body_bytes: u64 = 0;
        let mut body = res.into_body();
        while let Some(frame) = body.frame().await {
            let frame = frame.map_err(|e| ResptimeError::http(format!("failed to read h2 body: {}", e)))?;
            if let Some(data) = frame.data_ref() {
                body_bytes += data.len() as u64;
            }
        }

        Ok(HttpResponse {
            summary: HttpSummary::new(status, reason, "h2".to_string()),
            headers,
            first_byte_at,
            body_bytes,
        })
    }
}

fn body_framing(status: u16, headers: &ResponseHeaders) -> BodyFraming {
    if status == 204 || status == 304 {
        return BodyFraming::Empty;
    }
    if headers.transfer_encoding.as_deref().map(|t| t.contains("chunked")).unwrap_or(false) {
        return BodyFraming::Chunked;
    }
    match headers.content_length {
        Some(0) => BodyFraming::Empty,
        Some(n) => BodyFraming::Length(n),
        None => BodyFraming::UntilClose,
    }
}

/// Tracks how much of the body has arrived and whether it is finished.
#[derive(Debug)]
struct BodyReader {
    framing: BodyFraming,
    chunks: ChunkedDecoder,
    received: u64,
}

impl BodyReader {
    fn new(framing: BodyFraming) -> Self {
        Self { framing, chunks: ChunkedDecoder::default(), received: 0 }
    }

    fn feed(&mut self, data: &[u8]) -> Result<(), ResptimeError> {
        self.received += match self.framing {
            BodyFraming::Chunked => self.chunks.feed(data)?,
            _ => data.len() as u64,
        };
        Ok(())
    }

    fn is_complete(&self) -> bool {
        match self.framing {
            BodyFraming::Empty => true,
            BodyFraming::Length(n) => self.received >= n,
            BodyFraming::Chunked => self.chunks.is_done(),
            BodyFraming::UntilClose => false,
        }
    }

    /// Payload bytes, without chunk framing.
    fn received(&self) -> u64 {
        self.received
    }
}

const CHUNK_LINE_LIMIT: usize = 8 * 1024;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
enum ChunkState {
    #[default]
    Size,
    Data(u64),
    DataEnd,
    Trailer,
    Done,
}

/// Incremental `Transfer-Encoding: chunked` parser. It follows chunk sizes
/// and the trailer section, so data that merely looks like a terminator
/// does not end the body.
#[derive(Debug, Default)]
struct ChunkedDecoder {
    state: ChunkState,
    line: Vec<u8>,
}

impl ChunkedDecoder {
    /// Consumes `data` and returns the number of payload bytes in it.
    /// Bytes after the final CRLF are ignored.
    fn feed(&mut self, mut data: &[u8]) -> Result<u64, ResptimeError> {
        let mut payload = 0u64;
        while !data.is_empty() {
            match self.state {
                ChunkState::Done => break,
                ChunkState::Data(remaining) => {
                    let take = remaining.min(data.len() as u64);
                    payload += take;
                    data = &data[take as usize..];
                    self.state = if take == remaining { ChunkState::DataEnd } else { ChunkState::Data(remaining - take) };
                }
                ChunkState::Size | ChunkState::DataEnd | ChunkState::Trailer => {
                    let Some(pos) = data.iter().position(|&b| b == b'\n') else {
                        self.push_line(data)?;
                        break;
                    };
                    self.push_line(&data[..pos])?;
                    data = &data[pos + 1..];
                    let line = std::mem::take(&mut self.line);
                    self.end_line(trim_cr(&line))?;
                }
            }
        }
        Ok(payload)
    }

    fn is_done(&self) -> bool {
        self.state == ChunkState::Done
    }

    fn push_line(&mut self, part: &[u8]) -> Result<(), ResptimeError> {
        if self.line.len() + part.len() > CHUNK_LINE_LIMIT {
            return Err(ResptimeError::http("chunk header line too long"));
        }
        self.line.extend_from_slice(part);
        Ok(())
    }

    fn end_line(&mut self, line: &[u8]) -> Result<(), ResptimeError> {
        self.state = match self.state {
            ChunkState::Size => match parse_chunk_size(line)? {
                0 => ChunkState::Trailer,
                n => ChunkState::Data(n),
            },
            ChunkState::DataEnd if line.is_empty() => ChunkState::Size,
            ChunkState::DataEnd => return Err(ResptimeError::http("chunk data not followed by CRLF")),
            ChunkState::Trailer if line.is_empty() => ChunkState::Done,
            ChunkState::Trailer => ChunkState::Trailer,
            state => state,
        };
        Ok(())
    }
}

fn trim_cr(line: &[u8]) -> &[u8] {
    line.strip_suffix(b"\r").unwrap_or(line)
}

/// Hex size before any `;extension`.
fn parse_chunk_size(line: &[u8]) -> Result<u64, ResptimeError> {
    let text = std::str::from_utf8(line).map_err(|_| ResptimeError::http("invalid chunk size line"))?;
    let size = text.split(';').next().unwrap_or("").trim();
    u64::from_str_radix(size, 16).map_err(|_| ResptimeError::http(format!("invalid chunk size '{}'", size)))
}

fn find_header_end(data: &[u8]) -> Option<usize> {
    data.windows(4).position(|w| w == b"\r\n\r\n")
}

/// Parses the final (non-1xx) response head in `data`. Returns `None` while
/// the head is still incomplete, otherwise the offset where the body starts.
fn parse_response_with_1xx_skip(data: &[u8]) -> Result<Option<(HttpSummary, ResponseHeaders, usize)>, ResptimeError> {
    let mut offset = 0;
    loop {
        let remaining = &data[offset..];
        let headers_end = match find_header_end(remaining) {
            Some(end) => end,
            None => return Ok(None),
        };
        let (summary, headers) = parse_headers(&remaining[..headers_end])?;

        if (100..200).contains(&summary.status) {
            offset += headers_end + 4;
            continue;
        }

        return Ok(Some((summary, headers, offset + headers_end + 4)));
    }
}

fn parse_headers(header_bytes: &[u8]) -> Result<(HttpSummary, ResponseHeaders), ResptimeError> {
    let mut lines = header_bytes.split(|&b| b == b'\n');
    let status_line = lines.next().ok_or_else(|| ResptimeError::http("missing status line"))?;
    let status_line = std::str::from_utf8(status_line).map_err(|_| ResptimeError::http("invalid status line encoding"))?;
    let status_line = status_line.trim_end_matches('\r');

    let parts: Vec<&str> = status_line.splitn(3, ' ').collect();
    if parts.len() < 2 || !parts[0].starts_with("HTTP/") {
        return Err(ResptimeError::http(format!("invalid status line: {}", status_line)));
    }

    let version = if parts[0].contains("1.0") { "http/1.0" } else { "http/1.1" }.to_string();
    let status: u16 = parts[1].parse().map_err(|_| ResptimeError::http(format!("invalid status code: {}", parts[1])))?;
    let reason = parts.get(2).map(|s| s.trim().to_string()).filter(|s| !s.is_empty());

    let mut headers = ResponseHeaders::default();
    for line in lines {
        let line = std::str::from_utf8(line).unwrap_or("");
        let line = line.trim_end_matches('\r');
        if line.is_empty() { continue; }
        if let Some((key, value)) = line.split_once(':') {
            let value = value.trim();
            match key.trim().to_ascii_lowercase().as_str() {
                "location" => headers.location = Some(value.to_string()),
                "content-length" => headers.content_length = value.parse().ok(),
                "transfer-encoding" => headers.transfer_encoding = Some(value.to_ascii_lowercase()),
                _ => {}
            }
        }
    }

    Ok((HttpSummary::new(status, reason, version), headers))
}
