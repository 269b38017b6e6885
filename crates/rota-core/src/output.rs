//! Output formatting: human-readable route report, JSON, and JSON Lines.

use serde::Serialize;
use std::fmt::Write as _;
use std::io::{self, Write};

use crate::types::OptimizationResult;

/// Output format options.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    /// Human-readable report, one block per driver
    Text,
    /// Single JSON document
    Json,
    /// One JSON object per route (newline-delimited JSON)
    JsonLines,
}

impl OutputFormat {
    /// Parse format from string (case-insensitive).
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "text" | "txt" => Some(Self::Text),
            "json" => Some(Self::Json),
            "jsonl" | "jsonlines" | "ndjson" => Some(Self::JsonLines),
            _ => None,
        }
    }
}

/// A writer that emits optimization results in the chosen format.
pub struct OutputWriter<W: Write> {
    writer: W,
    format: OutputFormat,
    pretty: bool,
}

impl<W: Write> OutputWriter<W> {
    /// Create a new output writer.
    ///
    /// * `pretty` - Whether to pretty-print JSON (only affects JSON format)
    pub fn new(writer: W, format: OutputFormat, pretty: bool) -> Self {
        Self {
            writer,
            format,
            pretty,
        }
    }

    /// Write a full result.
    ///
    /// JSON writes the whole result object; JSONL writes one route per line
    /// and leaves citations out; text writes the route report.
    pub fn write_result(&mut self, result: &OptimizationResult) -> io::Result<()> {
        match self.format {
            OutputFormat::Text => {
                self.writer.write_all(render_text(result).as_bytes())?;
            }
            OutputFormat::Json => self.write_json(result)?,
            OutputFormat::JsonLines => {
                for route in result.routes() {
                    // JSONL is never pretty-printed (one object per line)
                    serde_json::to_writer(&mut self.writer, route).map_err(io::Error::other)?;
                    writeln!(self.writer)?;
                }
            }
        }
        Ok(())
    }

    fn write_json<T: Serialize>(&mut self, item: &T) -> io::Result<()> {
        if self.pretty {
            serde_json::to_writer_pretty(&mut self.writer, item).map_err(io::Error::other)?;
        } else {
            serde_json::to_writer(&mut self.writer, item).map_err(io::Error::other)?;
        }
        writeln!(self.writer)
    }

    /// Flush the underlying writer.
    pub fn flush(&mut self) -> io::Result<()> {
        self.writer.flush()
    }

    /// Consume the writer and return the underlying writer.
    pub fn into_inner(self) -> W {
        self.writer
    }
}

/// Render routes as plain text, stops sorted by their order.
pub fn render_text(result: &OptimizationResult) -> String {
    let mut out = String::new();

    for (i, route) in result.routes().iter().enumerate() {
        if i > 0 {
            out.push('\n');
        }
        let _ = writeln!(
            out,
            "{} ({} boxes, {} stops)",
            route.driver_label,
            route.total_boxes(),
            route.stops.len()
        );
        for stop in route.sorted_stops() {
            let _ = writeln!(out, "  {:>2}. {}", stop.order, stop.customer_name);
            let _ = writeln!(out, "      {}", stop.address);
            let _ = writeln!(out, "      {} box(es)", stop.box_count);
            if !stop.phone.trim().is_empty() {
                let _ = writeln!(out, "      tel. {}", stop.phone);
            }
        }
    }

    let linked: Vec<_> = result.linked_citations().collect();
    if !linked.is_empty() {
        out.push_str("\nSources used to plan the routes:\n");
        for citation in linked {
            let _ = writeln!(
                out,
                "  - {} <{}>",
                citation.display_title(),
                citation.uri.as_deref().unwrap_or_default()
            );
        }
    }

    out
}
