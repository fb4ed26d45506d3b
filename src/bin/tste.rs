use clap::Parser;
use tst_eval::cli::{CliError, TsteArgs};
use tst_eval::config::builtin_tasks;

fn main() -> Result<(), CliError> {
    env_logger::init();
    let args = TsteArgs::parse().layered()?;
    let tasks = builtin_tasks();

    if args.list_tasks {
        for name in tasks.keys() {
            println!("{name}");
        }
        return Ok(());
    }

    if let Some(name) = &args.task {
        let task = tasks.get(name).ok_or_else(|| CliError::UnknownTask {
            name: name.clone(),
        })?;
        if args.dry_run {
            log::info!("dry run: resolved task {name} without further work");
        }
        println!("{}", serde_json::to_string_pretty(task)?);
        return Ok(());
    }

    // No selection made; show what is available rather than doing nothing.
    for name in tasks.keys() {
        println!("{name}");
    }
    Ok(())
}
