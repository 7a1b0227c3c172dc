//! Console logging setup.
//!
//! Log events go to stderr with a bracketed glyph per level, so
//! operator-facing progress lines read like `[+] Port 22 open - SSH`.

use console::{style, StyledObject};
use tracing::{Event, Level, Subscriber};
use tracing_subscriber::fmt::format::{self, Writer};
use tracing_subscriber::fmt::{FmtContext, FormatEvent};
use tracing_subscriber::registry::LookupSpan;
use tracing_subscriber::EnvFilter;

/// Event formatter printing `<glyph> <message>`.
pub struct ConsoleFormatter;

fn glyph(level: &Level) -> StyledObject<&'static str> {
    let glyph = match *level {
        Level::TRACE => style("[ ]").dim(),
        Level::DEBUG => style("[?]").blue(),
        Level::INFO => style("[+]").green().bold(),
        Level::WARN => style("[*]").yellow().bold(),
        Level::ERROR => style("[-]").red().bold(),
    };
    glyph.for_stderr()
}

impl<S, N> FormatEvent<S, N> for ConsoleFormatter
where
    S: Subscriber + for<'a> LookupSpan<'a>,
    N: for<'a> format::FormatFields<'a> + 'static,
{
    fn format_event(
        &self,
        ctx: &FmtContext<'_, S, N>,
        mut writer: Writer<'_>,
        event: &Event<'_>,
    ) -> std::fmt::Result {
        write!(writer, "{} ", glyph(event.metadata().level()))?;
        ctx.field_format().format_fields(writer.by_ref(), event)?;
        writeln!(writer)
    }
}

/// Default filter directive for the given verbosity flags.
pub fn default_directive(verbose: bool, quiet: bool) -> &'static str {
    if quiet {
        "warn"
    } else if verbose {
        "portsweep=debug,warn"
    } else {
        "portsweep=info,warn"
    }
}

/// Install the global subscriber. `RUST_LOG` overrides the flags.
pub fn init(verbose: bool, quiet: bool) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directive(verbose, quiet)));

    // Already installed (e.g. by a test harness) is fine
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .event_format(ConsoleFormatter)
        .try_init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_glyphs() {
        console::set_colors_enabled_stderr(false);
        assert_eq!(glyph(&Level::INFO).to_string(), "[+]");
        assert_eq!(glyph(&Level::WARN).to_string(), "[*]");
        assert_eq!(glyph(&Level::ERROR).to_string(), "[-]");
        assert_eq!(glyph(&Level::DEBUG).to_string(), "[?]");
        assert_eq!(glyph(&Level::TRACE).to_string(), "[ ]");
    }

    #[test]
    fn test_default_directive() {
        assert_eq!(default_directive(false, false), "portsweep=info,warn");
        assert_eq!(default_directive(true, false), "portsweep=debug,warn");
        assert_eq!(default_directive(true, true), "warn");
    }
}
