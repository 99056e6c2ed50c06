use std::fmt::Display;
use std::io::{self, Write};
use std::panic;

use color_eyre::eyre::Result;

/// Panic reports go straight to stderr so they survive any log filter.
pub fn install_hooks() -> Result<()> {
    let hook_builder = color_eyre::config::HookBuilder::default().display_env_section(false);
    let (panic_hook, eyre_hook) = hook_builder.into_hooks();
    eyre_hook.install()?;

    panic::set_hook(Box::new(move |panic_info| {
        let _ = write_report(&mut io::stderr(), panic_hook.panic_report(panic_info));
    }));

    Ok(())
}

fn write_report(out: &mut impl Write, report: impl Display) -> io::Result<()> {
    writeln!(out, "{report}")?;
    out.flush()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn report_is_written_whole_with_newline() {
        let mut out = Vec::new();

        write_report(&mut out, "The application panicked\nMessage: boom").unwrap();

        assert_eq!(
            String::from_utf8(out).unwrap(),
            "The application panicked\nMessage: boom\n"
        );
    }
}
