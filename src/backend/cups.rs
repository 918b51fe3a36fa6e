//! CUPS print service, driven through its command-line clients
//!
//! - `lpstat -e` lists the destinations,
//! - `lpoptions -p <queue>` tells which paper a queue is loaded with,
//! - `lp -d <queue> -t <title> -` takes the spooled PDF on stdin.

use std::io::Write;
use std::process::{Command, Stdio};
use std::thread;

use tracing::{debug, info};

use crate::error::{Error, Result};
use crate::job::{JobSubmitter, Printable};
use crate::layout::{Length, PageFormat, Paper};
use crate::pdf::spool_document;
use crate::registry::{PrinterEnumerator, PrinterHandle};

use super::aborted;

/// Local CUPS queues
#[derive(Debug, Clone)]
pub struct CupsBackend {
    /// Paper assumed for queues that do not report one
    pub default_paper: Paper,
    /// Unprintable border on every side of the page
    pub margin: Length,
}

impl CupsBackend {
    pub fn new(default_paper: Paper, margin: Length) -> Self {
        Self {
            default_paper,
            margin,
        }
    }

    fn page_format(&self, queue: &str) -> PageFormat {
        let paper = match Command::new("lpoptions").args(["-p", queue]).output() {
            Ok(output) if output.status.success() => {
                parse_media(&String::from_utf8_lossy(&output.stdout))
            }
            Ok(output) => {
                debug!(
                    queue,
                    stderr = %String::from_utf8_lossy(&output.stderr).trim(),
                    "lpoptions failed"
                );
                None
            }
            Err(e) => {
                debug!(queue, error = %e, "lpoptions unavailable");
                None
            }
        };
        PageFormat::with_margin(paper.unwrap_or(self.default_paper), self.margin)
    }
}

impl Default for CupsBackend {
    fn default() -> Self {
        Self::new(Paper::Letter, Length::from_inches(1.0))
    }
}

impl PrinterEnumerator for CupsBackend {
    fn enumerate(&self) -> Result<Vec<(String, PrinterHandle)>> {
        let output = Command::new("lpstat")
            .arg("-e")
            .output()
            .map_err(|e| Error::Enumeration(format!("lpstat: {e}")))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            // CUPS without any queue answers with an error status
            if stderr.contains("No destinations") {
                return Ok(Vec::new());
            }
            return Err(Error::Enumeration(format!("lpstat: {}", stderr.trim())));
        }

        Ok(parse_destinations(&String::from_utf8_lossy(&output.stdout))
            .into_iter()
            .map(|queue| {
                let handle = PrinterHandle::new(queue.clone(), queue.clone(), self.page_format(&queue));
                (queue, handle)
            })
            .collect())
    }
}

impl JobSubmitter for CupsBackend {
    fn submit(&self, printer: &PrinterHandle, title: &str, document: &dyn Printable) -> Result<()> {
        let pdf = spool_document(document, &printer.page, title)?;

        let mut lp = Command::new("lp");
        lp.args(["-d", printer.device.as_str(), "-t", title, "-"]);
        let response = pipe_job(&mut lp, pdf).map_err(|reason| aborted(printer, reason))?;

        info!(printer = %printer.name, %response, "job accepted by CUPS");
        Ok(())
    }
}

/// Run `command` with `data` on its stdin and return its trimmed stdout.
///
/// Stdin is fed from a separate thread while stdout and stderr are drained, so
/// neither side can block on a full pipe. The job fails when the command
/// cannot be started, exits unsuccessfully or does not take all of `data`.
fn pipe_job(command: &mut Command, data: Vec<u8>) -> std::result::Result<String, String> {
    let program = command.get_program().to_string_lossy().into_owned();
    let mut child = command
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .map_err(|e| format!("{program}: {e}"))?;

    let stdin = child.stdin.take();
    let writer = thread::spawn(move || match stdin {
        // stdin is dropped at the end so the command sees end of file
        Some(mut stdin) => stdin.write_all(&data),
        None => Ok(()),
    });

    let output = child
        .wait_with_output()
        .map_err(|e| format!("{program}: {e}"))?;
    let written = writer
        .join()
        .map_err(|_| format!("{program}: job writer panicked"))?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        let stderr = stderr.trim();
        return Err(if stderr.is_empty() {
            format!("{program}: {}", output.status)
        } else {
            stderr.to_string()
        });
    }
    if let Err(e) = written {
        debug!(%program, error = %e, "job data not fully written");
        return Err(format!("{program}: job data not fully written: {e}"));
    }

    Ok(String::from_utf8_lossy(&output.stdout).trim().to_string())
}

/// Queue names from `lpstat -e`, one per line
fn parse_destinations(output: &str) -> Vec<String> {
    output
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(str::to_string)
        .collect()
}

/// Paper named by the `media=` or `PageSize=` option in `lpoptions` output
fn parse_media(options: &str) -> Option<Paper> {
    options
        .split_whitespace()
        .filter_map(|option| {
            option
                .strip_prefix("media=")
                .or_else(|| option.strip_prefix("PageSize="))
        })
        // media may list several keywords, e.g. "media=a4,tray1"
        .flat_map(|value| value.split(','))
        .find_map(Paper::from_media_name)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_destinations() {
        let output = "HP_LaserJet\nZebra_ZD420\n\n  Office/duplex \n";
        assert_eq!(
            parse_destinations(output),
            vec!["HP_LaserJet", "Zebra_ZD420", "Office/duplex"]
        );
        assert!(parse_destinations("").is_empty());
    }

    #[test]
    fn test_parse_media() {
        let options = "copies=1 device-uri=usb://HP/LaserJet finishings=3 media=iso_a4_210x297mm sides=one-sided";
        assert_eq!(parse_media(options), Some(Paper::A4));
        assert_eq!(parse_media("PageSize=Letter"), Some(Paper::Letter));
        assert_eq!(parse_media("media=tray1,na_legal_8.5x14in"), Some(Paper::Legal));
        assert_eq!(parse_media("copies=1 media=custom_62x100mm"), None);
        assert_eq!(parse_media("copies=1"), None);
    }

    #[cfg(unix)]
    #[test]
    fn test_pipe_job_feeds_stdin() {
        let response = pipe_job(&mut Command::new("cat"), b"%PDF-1.5 job\n".to_vec()).unwrap();
        assert_eq!(response, "%PDF-1.5 job");
    }

    #[cfg(unix)]
    #[test]
    fn test_pipe_job_large_input_with_chatty_command() {
        // cat echoes everything back, so stdout must be drained while writing
        let data = vec![b'x'; 1 << 20];
        let response = pipe_job(&mut Command::new("cat"), data).unwrap();
        assert_eq!(response.len(), 1 << 20);
    }

    #[cfg(unix)]
    #[test]
    fn test_pipe_job_failed_status() {
        let mut command = Command::new("sh");
        command.args(["-c", "cat >/dev/null; echo 'lp: printer offline' >&2; exit 1"]);
        let result = pipe_job(&mut command, b"data".to_vec());
        assert_eq!(result, Err("lp: printer offline".to_string()));

        assert!(pipe_job(&mut Command::new("false"), Vec::new()).is_err());
    }

    #[cfg(unix)]
    #[test]
    fn test_pipe_job_unread_input_fails() {
        // `true` exits without reading, so the write hits a closed pipe even
        // though the command itself succeeds
        let data = vec![0u8; 1 << 20];
        let result = pipe_job(&mut Command::new("true"), data);
        assert!(matches!(result, Err(ref reason) if reason.contains("not fully written")));
    }

    #[test]
    fn test_pipe_job_missing_program() {
        let result = pipe_job(&mut Command::new("/nonexistent/lp"), b"data".to_vec());
        assert!(matches!(result, Err(ref reason) if reason.starts_with("/nonexistent/lp: ")));
    }
}
