#![warn(clippy::pedantic)]

pub mod flatten;
pub mod preview;
pub mod script;
pub mod settings;

use anyhow::Result as AnyResult;

/// Parse and replay one script file against a fresh canvas.
fn run_script(path: &std::path::Path, settings: &settings::Settings) -> AnyResult<()> {
    use anyhow::Context;
    let text = std::fs::read_to_string(path).with_context(|| format!("reading {path:?}"))?;
    let commands = script::parse(&text)?;
    let base_dir = path.parent().unwrap_or_else(|| std::path::Path::new("."));
    let mut runner = script::Runner::new(settings, base_dir);
    runner.run(&commands)?;
    log::info!(
        "Finished {path:?} with {} strokes",
        runner.canvas().strokes().len()
    );
    Ok(())
}

fn main() -> AnyResult<()> {
    let has_term = std::io::IsTerminal::is_terminal(&std::io::stdin());
    // Log to a terminal, if available. Else, log to "log.out" in the working directory.
    if has_term {
        env_logger::builder()
            .filter_level(log::LevelFilter::Debug)
            .init();
    } else {
        let _ = simple_logging::log_to_file("log.out", log::LevelFilter::Debug);
    }

    let settings = settings::Settings::load();
    if let Err(e) = settings.save() {
        log::warn!("Failed to save settings:\n{e:?}");
    };

    // Args are a simple list of script paths, each run against its own canvas.
    // Paths are OSStrings, let the system handle character encoding restrictions.
    let paths: Vec<std::path::PathBuf> = std::env::args_os().skip(1).map(Into::into).collect();
    if paths.is_empty() {
        log::warn!("No scripts given. Usage: sketchbook <script>...");
        return Ok(());
    }
    let mut had_success = false;
    for path in &paths {
        match run_script(path, &settings) {
            Ok(()) => had_success = true,
            Err(e) => log::error!("failed to run script {path:?}: {e:#}"),
        }
    }
    if !had_success {
        anyhow::bail!("Failed to run any provided script.");
    }
    Ok(())
}
