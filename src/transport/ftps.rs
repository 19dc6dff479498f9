//! FTP over explicit TLS
//!
//! Uses `suppaftp` with the native-tls backend. Files are sent in ASCII type
//! so line endings are translated by the server, matching a `STOR` of lines.

use std::io::Read;

use suppaftp::native_tls::TlsConnector;
use suppaftp::types::{FileType, FormatControl};
use suppaftp::{NativeTlsConnector, NativeTlsFtpStream};

use super::{Connector, Transport};
use crate::config::RemoteConfig;
use crate::error::{WebsyncError, WebsyncResult};

const DEFAULT_PORT: u16 = 21;

/// Opens an authenticated FTPS session per call
#[derive(Debug, Clone, Copy, Default)]
pub struct FtpsConnector;

impl FtpsConnector {
    pub fn new() -> Self {
        Self
    }
}

/// Split `host[:port]` into the TLS domain and the socket address
fn split_host(host: &str) -> (&str, String) {
    match host.rsplit_once(':') {
        Some((domain, port)) if port.parse::<u16>().is_ok() => (domain, host.to_string()),
        _ => (host, format!("{host}:{DEFAULT_PORT}")),
    }
}

impl Connector for FtpsConnector {
    fn connect(&self, remote: &RemoteConfig) -> WebsyncResult<Box<dyn Transport>> {
        let connect_err = |message: String| WebsyncError::TransportConnect {
            host: remote.host.clone(),
            message,
        };

        let (domain, addr) = split_host(&remote.host);
        tracing::debug!(addr = %addr, "opening FTPS session");

        let tls = TlsConnector::new().map_err(|e| connect_err(e.to_string()))?;
        let stream = NativeTlsFtpStream::connect(&addr).map_err(|e| connect_err(e.to_string()))?;
        let mut stream = stream
            .into_secure(NativeTlsConnector::from(tls), domain)
            .map_err(|e| connect_err(e.to_string()))?;
        stream
            .login(&remote.username, &remote.password)
            .map_err(|e| connect_err(e.to_string()))?;
        stream
            .transfer_type(FileType::Ascii(FormatControl::Default))
            .map_err(|e| connect_err(e.to_string()))?;

        Ok(Box::new(FtpsSession { stream }))
    }
}

struct FtpsSession {
    stream: NativeTlsFtpStream,
}

fn transfer_err(remote: &str, err: suppaftp::FtpError) -> WebsyncError {
    WebsyncError::Transport {
        remote: remote.to_string(),
        message: err.to_string(),
    }
}

impl Transport for FtpsSession {
    fn dir_exists(&mut self, path: &str) -> WebsyncResult<bool> {
        // every path used is absolute, so moving the working directory is harmless
        Ok(self.stream.cwd(path).is_ok())
    }

    fn make_dir(&mut self, path: &str) -> WebsyncResult<()> {
        self.stream.mkdir(path).map_err(|e| transfer_err(path, e))
    }

    fn store(&mut self, remote: &str, mut reader: &mut dyn Read) -> WebsyncResult<()> {
        self.stream
            .put_file(remote, &mut reader)
            .map(|_| ())
            .map_err(|e| transfer_err(remote, e))
    }

    fn quit(&mut self) -> WebsyncResult<()> {
        self.stream.quit().map_err(|e| transfer_err("", e))
    }
}
