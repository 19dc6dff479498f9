use std::io::{self, Write};
use std::sync::Arc;

use websync::{ConfigWarning, DaemonEvent, EventSink};

pub fn print_config_warnings(warnings: &[ConfigWarning]) {
    for w in warnings {
        if let Some(line) = w.line {
            eprintln!("⚠ Unknown config key '{}' in {}:{}", w.key, w.file.display(), line);
        } else {
            eprintln!("⚠ Unknown config key '{}' in {}", w.key, w.file.display());
        }

        if let Some(suggestion) = &w.suggestion {
            eprintln!("   Did you mean '{}'?\n", suggestion);
        }
    }
}

/// Write a single NDJSON line
pub fn write_json_line(out: &mut impl Write, line: &str) -> io::Result<()> {
    out.write_all(line.as_bytes())?;
    out.write_all(b"\n")
}

/// Render one notice: NDJSON on stdout, or a timestamped line (errors on stderr)
pub fn print_event(event: &DaemonEvent, json: bool) {
    if json {
        let mut out = io::stdout().lock();
        let _ = write_json_line(&mut out, &event.to_json());
        return;
    }

    let timestamp = chrono::Local::now().format("%H:%M:%S");
    match event {
        DaemonEvent::Error { .. } | DaemonEvent::Offline { .. } => {
            eprintln!("[{timestamp}] {}", event.to_line())
        }
        _ => println!("[{timestamp}] {}", event.to_line()),
    }
}

/// Sink that prints every notice as it arrives
pub fn printing_sink(json: bool) -> EventSink {
    Arc::new(move |event| print_event(&event, json))
}
