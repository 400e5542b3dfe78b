pub mod capabilities;

use std::io::{Read, Write};
use std::net::TcpStream;
use std::time::Duration;

use thiserror::Error;

use crate::models::Credentials;
use capabilities::Datastore;

/// NETCONF well-known SSH subsystem name
const SUBSYSTEM: &str = "netconf";
/// End-of-message delimiter for RFC 6242 framing
const EOM: &[u8] = b"]]>]]>";
/// NETCONF base namespace, also the base:1.0 capability advertised in hello
const BASE_NS: &str = "urn:ietf:params:xml:ns:netconf:base:1.0";
const BASE_CAPABILITY: &str = "urn:ietf:params:netconf:base:1.0";

#[derive(Debug, Error)]
pub enum NetconfError {
    #[error("invalid address {0}")]
    Address(String),

    #[error("{0}")]
    Io(#[from] std::io::Error),

    #[error("ssh error: {0}")]
    Ssh(#[from] ssh2::Error),

    #[error("authentication failed: all methods exhausted")]
    AuthFailed,

    #[error("session closed before a complete reply was received")]
    Truncated,

    #[error("device reported an error: {0}")]
    Rpc(String),
}

/// One RPC reply, raw XML as received (framing delimiter stripped)
#[derive(Debug, Clone)]
pub struct RpcReply {
    pub raw: String,
}

impl RpcReply {
    /// Surface an `<rpc-error>` reply as an error value, carrying the
    /// device's error-message text when it sent one.
    fn parse(raw: String) -> Result<Self, NetconfError> {
        if raw.contains("<rpc-error") {
            let detail = extract_first(&raw, "error-message")
                .unwrap_or_else(|| raw.trim().to_string());
            return Err(NetconfError::Rpc(detail));
        }
        Ok(Self { raw })
    }
}

/// Operations the orchestrator needs from a management session.
/// Implemented by the real NETCONF session and by test mocks.
pub trait ManagementSession {
    fn capabilities(&self) -> &[String];
    fn edit_config(&mut self, target: Datastore, config: &str) -> Result<RpcReply, NetconfError>;
    fn commit(&mut self) -> Result<RpcReply, NetconfError>;
    fn dispatch(&mut self, payload: &str) -> Result<RpcReply, NetconfError>;
}

/// Keyboard-interactive prompt handler that always responds with the password
struct PasswordPrompt {
    password: String,
}

impl ssh2::KeyboardInteractivePrompt for PasswordPrompt {
    fn prompt<'a>(
        &mut self,
        _username: &str,
        _instructions: &str,
        prompts: &[ssh2::Prompt<'a>],
    ) -> Vec<String> {
        prompts.iter().map(|_| self.password.clone()).collect()
    }
}

/// An authenticated NETCONF session over an ssh2 subsystem channel.
/// Dropping the session releases it: `<close-session/>` is sent best-effort
/// and the channel is closed, whichever way the orchestration exits.
pub struct NetconfSession {
    channel: ssh2::Channel,
    // The transport must outlive the channel
    _session: ssh2::Session,
    capabilities: Vec<String>,
    message_id: u64,
    closed: bool,
}

impl NetconfSession {
    /// Open a NETCONF session: TCP connect, SSH handshake and auth, the
    /// netconf subsystem channel, then the hello exchange.
    pub fn connect(
        host: &str,
        port: u16,
        credentials: &Credentials,
        timeout_secs: u64,
    ) -> Result<Self, NetconfError> {
        let addr = format!("{}:{}", host.trim(), port);
        let socket_addr = addr
            .parse()
            .map_err(|e| NetconfError::Address(format!("{}: {}", addr, e)))?;
        let tcp = TcpStream::connect_timeout(&socket_addr, Duration::from_secs(timeout_secs))?;

        tcp.set_read_timeout(Some(Duration::from_secs(timeout_secs))).ok();
        tcp.set_write_timeout(Some(Duration::from_secs(timeout_secs))).ok();

        let mut session = ssh2::Session::new()?;
        session.set_tcp_stream(tcp);
        session.set_timeout(timeout_secs as u32 * 1000);
        session.handshake()?;

        // Try password auth first
        match session.userauth_password(&credentials.username, &credentials.password) {
            Ok(_) if session.authenticated() => {}
            _ => {
                // Keyboard-interactive fallback (needed by some network OSes)
                let mut prompter = PasswordPrompt {
                    password: credentials.password.clone(),
                };
                let _ = session.userauth_keyboard_interactive(&credentials.username, &mut prompter);
            }
        }

        if !session.authenticated() {
            return Err(NetconfError::AuthFailed);
        }

        let mut channel = session.channel_session()?;
        channel.subsystem(SUBSYSTEM)?;

        let mut netconf = Self {
            channel,
            _session: session,
            capabilities: Vec::new(),
            message_id: 0,
            closed: false,
        };
        netconf.hello()?;
        Ok(netconf)
    }

    /// Read the server hello, record its advertised capabilities, then send
    /// the client hello. Only base:1.0 end-of-message framing is spoken.
    fn hello(&mut self) -> Result<(), NetconfError> {
        let server_hello = self.read_message()?;
        self.capabilities = extract_all(&server_hello, "capability");

        let client_hello = format!(
            "<hello xmlns=\"{}\"><capabilities><capability>{}</capability></capabilities></hello>",
            BASE_NS, BASE_CAPABILITY
        );
        self.write_message(&client_hello)
    }

    fn write_message(&mut self, body: &str) -> Result<(), NetconfError> {
        self.channel.write_all(body.as_bytes())?;
        self.channel.write_all(EOM)?;
        self.channel.flush()?;
        Ok(())
    }

    /// Read channel bytes until the end-of-message delimiter
    fn read_message(&mut self) -> Result<String, NetconfError> {
        let mut buffer = Vec::new();
        let mut chunk = [0u8; 4096];
        loop {
            let n = self.channel.read(&mut chunk)?;
            if n == 0 {
                return Err(NetconfError::Truncated);
            }
            buffer.extend_from_slice(&chunk[..n]);
            if let Some(end) = find_delimiter(&buffer) {
                return Ok(String::from_utf8_lossy(&buffer[..end]).into_owned());
            }
        }
    }

    /// Send one rpc envelope and read its reply
    fn rpc(&mut self, body: &str) -> Result<RpcReply, NetconfError> {
        self.message_id += 1;
        let envelope = format!(
            "<rpc message-id=\"{}\" xmlns=\"{}\">{}</rpc>",
            self.message_id, BASE_NS, body
        );
        self.write_message(&envelope)?;
        let raw = self.read_message()?;
        RpcReply::parse(raw)
    }

    /// Best-effort session teardown; safe to call more than once
    pub fn close(&mut self) {
        if self.closed {
            return;
        }
        self.closed = true;
        let _ = self.rpc("<close-session/>");
        let _ = self.channel.close();
    }
}

impl ManagementSession for NetconfSession {
    fn capabilities(&self) -> &[String] {
        &self.capabilities
    }

    fn edit_config(&mut self, target: Datastore, config: &str) -> Result<RpcReply, NetconfError> {
        self.rpc(&format!(
            "<edit-config><target><{}/></target>{}</edit-config>",
            target.as_str(),
            config
        ))
    }

    fn commit(&mut self) -> Result<RpcReply, NetconfError> {
        self.rpc("<commit/>")
    }

    fn dispatch(&mut self, payload: &str) -> Result<RpcReply, NetconfError> {
        self.rpc(payload)
    }
}

impl Drop for NetconfSession {
    fn drop(&mut self) {
        self.close();
    }
}

/// Byte offset of the first end-of-message delimiter, if present
fn find_delimiter(buffer: &[u8]) -> Option<usize> {
    buffer.windows(EOM.len()).position(|window| window == EOM)
}

/// Text content of every `<tag>...</tag>` element in a raw XML string.
/// Tag-name matching only; enough for hello and rpc-reply documents.
fn extract_all(raw: &str, tag: &str) -> Vec<String> {
    let open = format!("<{}", tag);
    let close = format!("</{}>", tag);
    let mut found = Vec::new();
    let mut rest = raw;

    while let Some(start) = rest.find(&open) {
        let after = &rest[start + open.len()..];
        let Some(gt) = after.find('>') else { break };
        // Skip longer tag names that merely share the prefix
        let head = &after[..gt];
        if !(head.is_empty() || head.starts_with(|c: char| c.is_whitespace())) {
            rest = &after[gt + 1..];
            continue;
        }
        let body = &after[gt + 1..];
        let Some(end) = body.find(&close) else { break };
        found.push(body[..end].trim().to_string());
        rest = &body[end + close.len()..];
    }

    found
}

/// Text content of the first `<tag>...</tag>` element, if any
fn extract_first(raw: &str, tag: &str) -> Option<String> {
    extract_all(raw, tag).into_iter().next()
}
