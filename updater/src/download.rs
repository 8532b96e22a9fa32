//! HTTP artifact fetcher used by the platform backfill.
//!
//! Bodies are streamed straight into the SHA-512 hasher; nothing is written
//! to disk.

use std::sync::OnceLock;
use std::time::Duration;
use verification_metadata::digest::{Sha512Digest, sha512_reader};
use verification_metadata::fetch::{ArtifactFetcher, FetchError};

/// Network timeout for a single artifact download.
const DOWNLOAD_TIMEOUT: Duration = Duration::from_secs(120);

/// [`ArtifactFetcher`] backed by a shared `ureq` agent.
///
/// # Examples
///
/// ```no_run
/// use verification_metadata::fetch::ArtifactFetcher;
/// use verification_updater::download::HttpFetcher;
///
/// let digest = HttpFetcher.fetch_sha512(
///     "https://dl.google.com/android/maven2/com/android/tools/build/aapt2/8.2.2-10154469/aapt2-8.2.2-10154469-osx.jar",
/// )?;
/// println!("{digest}");
/// # Ok::<(), verification_metadata::fetch::FetchError>(())
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct HttpFetcher;

impl ArtifactFetcher for HttpFetcher {
    fn fetch_sha512(&self, url: &str) -> Result<Sha512Digest, FetchError> {
        log::debug!("downloading {url}");
        let response = http_agent()
            .get(url)
            .call()
            .map_err(|e| map_ureq_error(url, &e))?;

        let status = response.status().as_u16();
        if status != 200 {
            return Err(FetchError::Status {
                url: url.to_owned(),
                status,
            });
        }

        let mut body = response.into_body();
        sha512_reader(&mut body.as_reader()).map_err(|source| FetchError::Body {
            url: url.to_owned(),
            source,
        })
    }
}

/// Shared `ureq` agent with request timeout configuration.
fn http_agent() -> &'static ureq::Agent {
    static AGENT: OnceLock<ureq::Agent> = OnceLock::new();
    AGENT.get_or_init(|| {
        let config = ureq::Agent::config_builder()
            .timeout_global(Some(DOWNLOAD_TIMEOUT))
            .build();
        ureq::Agent::new_with_config(config)
    })
}

/// Map a ureq error to a [`FetchError`].
fn map_ureq_error(url: &str, err: &ureq::Error) -> FetchError {
    match err {
        ureq::Error::StatusCode(status) => FetchError::Status {
            url: url.to_owned(),
            status: *status,
        },
        other => FetchError::Http {
            url: url.to_owned(),
            reason: other.to_string(),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use std::io::{Read, Write};
    use std::net::TcpListener;
    use std::thread;

    /// Serve `response` to a single connection and return the artifact URL.
    fn serve_once(response: &'static str) -> String {
        let listener = TcpListener::bind("127.0.0.1:0").expect("bind");
        let addr = listener.local_addr().expect("local addr");
        thread::spawn(move || {
            let Ok((mut stream, _)) = listener.accept() else {
                return;
            };
            let mut request = Vec::new();
            let mut buf = [0_u8; 1024];
            while !request.windows(4).any(|window| window == b"\r\n\r\n") {
                match stream.read(&mut buf) {
                    Ok(0) | Err(_) => return,
                    Ok(n) => request.extend_from_slice(&buf[..n]),
                }
            }
            let _ = stream.write_all(response.as_bytes());
        });
        format!("http://{addr}/aapt2-osx.jar")
    }

    #[rstest]
    #[case(404)]
    #[case(500)]
    #[case(503)]
    fn map_ureq_error_keeps_status_code(#[case] code: u16) {
        let err = ureq::Error::StatusCode(code);
        let mapped = map_ureq_error("https://example.test/a.jar", &err);
        assert!(matches!(
            mapped,
            FetchError::Status { status, ref url }
                if status == code && url == "https://example.test/a.jar"
        ));
    }

    #[test]
    fn map_ureq_error_maps_transport_failure_to_http_error() {
        let err = ureq::Error::HostNotFound;
        let mapped = map_ureq_error("https://example.test/a.jar", &err);
        assert!(matches!(mapped, FetchError::Http { .. }));
        assert!(
            mapped
                .to_string()
                .starts_with("download failed for https://example.test/a.jar")
        );
    }

    #[test]
    fn success_status_other_than_ok_is_fatal() {
        let url = serve_once(
            "HTTP/1.1 204 No Content\r\nContent-Length: 0\r\nConnection: close\r\n\r\n",
        );
        let err = HttpFetcher
            .fetch_sha512(&url)
            .expect_err("204 must not produce a digest");
        assert!(
            matches!(err, FetchError::Status { status: 204, .. }),
            "unexpected error: {err:?}"
        );
    }

    #[test]
    fn ok_response_body_is_hashed() {
        let url = serve_once(
            "HTTP/1.1 200 OK\r\nContent-Length: 3\r\nConnection: close\r\n\r\nabc",
        );
        let digest = HttpFetcher.fetch_sha512(&url).expect("download succeeds");
        let expected = sha512_reader(&mut &b"abc"[..]).expect("hash in memory");
        assert_eq!(digest, expected);
    }

    #[test]
    fn http_agent_is_shared() {
        assert!(std::ptr::eq(http_agent(), http_agent()));
    }
}
