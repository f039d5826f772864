//! spindle - operator CLI for the task queue control plane.
//!
//! Usage:
//!   spindle <command> [options]
//!
//! Commands:
//!   demo [--queue <name>] [--retry <n>]   Walk through the admin operations on an in-memory store
//!   store-info                            Print diagnostics of the store at SPINDLE_REDIS_URL
//!   help                                  Show this message

use std::process::ExitCode;
use std::sync::Arc;

use chrono::{Duration as ChronoDuration, Utc};
use serde::Serialize;
use tokio::time::{Duration, sleep};
use tracing::info;

use spindle_core::app::{AdminConsole, ConsoleBuilder, StatusClass};
use spindle_core::config::AdminConfig;
use spindle_core::domain::{AdminError, QueueName, RetryInfo};
use spindle_core::impls::{InMemoryInspector, RedisDiagnostics, StaticDiagnostics};
use spindle_core::observability::init_tracing;

fn print_usage() {
    eprintln!(
        r#"Usage: spindle <command> [options]

Inspect and operate a Redis-backed task queue.

COMMANDS:
    demo [--queue <name>] [--retry <n>]
                        Seed an in-memory store and walk through the
                        admin operations, printing each result as JSON
    store-info          Print diagnostics of the store at SPINDLE_REDIS_URL
    help                Show this message

ENVIRONMENT:
    SPINDLE_REDIS_URL            Store address (default: redis://127.0.0.1:6379)
    SPINDLE_STORE_TIMEOUT_MS     Bound on each store call (default: 5000)
    SPINDLE_DEFAULT_PAGE_SIZE    List page size (default: 20)
    SPINDLE_MAX_PAGE_SIZE        Largest page size (default: 100)
    SPINDLE_LOG                  Log filter (default: info)
    SPINDLE_LOG_JSON             JSON logs (default: false)"#
    );
}

#[derive(Debug, PartialEq, Eq)]
enum Command {
    Help,
    Demo { queue: String, retry: u32 },
    StoreInfo,
}

fn parse_args_from_vec(args: &[String]) -> Result<Command, String> {
    if args.len() < 2 {
        return Err("No command specified".to_string());
    }

    match args[1].as_str() {
        "help" | "--help" | "-h" => Ok(Command::Help),
        "store-info" => match args.get(2) {
            None => Ok(Command::StoreInfo),
            Some(arg) => Err(format!("Unknown argument: {}", arg)),
        },
        "demo" => {
            let mut queue = "email".to_string();
            let mut retry = 5;

            let mut i = 2;
            while i < args.len() {
                match args[i].as_str() {
                    "--queue" => {
                        i += 1;
                        queue = args.get(i).ok_or("--queue requires a name")?.clone();
                    }
                    "--retry" => {
                        i += 1;
                        let raw = args.get(i).ok_or("--retry requires a count")?;
                        retry = raw
                            .parse()
                            .map_err(|_| format!("--retry must be a number, got {}", raw))?;
                    }
                    arg => return Err(format!("Unknown argument: {}", arg)),
                }
                i += 1;
            }

            Ok(Command::Demo { queue, retry })
        }
        cmd => Err(format!("Unknown command: {}", cmd)),
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    let args: Vec<String> = std::env::args().collect();
    let cmd = match parse_args_from_vec(&args) {
        Ok(Command::Help) => {
            print_usage();
            return ExitCode::SUCCESS;
        }
        Ok(cmd) => cmd,
        Err(e) => {
            eprintln!("Error: {}", e);
            eprintln!();
            print_usage();
            return ExitCode::FAILURE;
        }
    };

    let config = match AdminConfig::from_env() {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Configuration error: {}", e);
            return ExitCode::FAILURE;
        }
    };
    init_tracing(&config.log);

    let result = match cmd {
        Command::Demo { queue, retry } => run_demo(config, &queue, retry).await,
        Command::StoreInfo => store_info(&config).await,
        Command::Help => Ok(()),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            report_error(&e);
            ExitCode::FAILURE
        }
    }
}

fn report_error(err: &AdminError) {
    let class = err.status_class();
    eprintln!("Error: {} ({:?}, {})", err, class, class.http_status());
}

fn print_json<T: Serialize>(label: &str, value: &T) {
    match serde_json::to_string_pretty(value) {
        Ok(json) => println!("== {label}\n{json}"),
        Err(e) => eprintln!("== {label}: cannot encode result: {e}"),
    }
}

/// Print a result that is expected to fail, with its status class.
fn print_rejection<T>(label: &str, result: Result<T, AdminError>) {
    let class = StatusClass::of(&result);
    match result {
        Ok(_) => println!("== {label}\nunexpectedly succeeded"),
        Err(e) => println!("== {label}\n{} -> {}", e, class.http_status()),
    }
}

async fn store_info(config: &AdminConfig) -> Result<(), AdminError> {
    let diagnostics = RedisDiagnostics::open(&config.redis_url)?;
    let inspector = Arc::new(InMemoryInspector::new());
    let console = ConsoleBuilder::new()
        .inspector(inspector)
        .diagnostics(Arc::new(diagnostics))
        .config(config.clone())
        .build()
        .map_err(|e| AdminError::validation("config", e.to_string()))?;

    print_json("store info", &console.store_info().await?);
    console.close().await
}

/// A worker that dequeues and finishes tasks until aborted.
async fn worker_loop(inspector: Arc<InMemoryInspector>, queue: QueueName) {
    let mut n = 0u32;
    loop {
        if let Some(id) = inspector.activate(&queue).await {
            sleep(Duration::from_millis(20)).await;
            n += 1;
            // every third task fails and goes to retry
            if n % 3 == 0 {
                let retry_at = Utc::now() + ChronoDuration::seconds(30);
                inspector.fail(&queue, &id, "smtp: 421 try again later", Some(retry_at)).await;
            } else {
                inspector.complete(&queue, &id).await;
            }
        }
        sleep(Duration::from_millis(10)).await;
    }
}

async fn seed(inspector: &InMemoryInspector, queue: &QueueName, retry: u32) {
    let now = Utc::now();
    for i in 0..6 {
        let payload = format!(r#"{{"to":"user{i}@example.com"}}"#).into_bytes();
        inspector.enqueue(queue, "email:welcome", payload).await;
    }
    for minutes in [45, 15, 30] {
        inspector
            .schedule(queue, "email:digest", Vec::new(), now + ChronoDuration::minutes(minutes))
            .await;
    }
    for i in 0..retry {
        let info = RetryInfo {
            retried: 1 + i % 3,
            max_retry: 25,
            last_error: Some("smtp: connection reset".to_string()),
            last_failed_at: Some(now - ChronoDuration::minutes(1)),
        };
        let retry_at = now + ChronoDuration::minutes(i64::from(i) + 1);
        inspector
            .add_retry(queue, "email:welcome", Vec::new(), retry_at, info)
            .await;
    }
    let entry = inspector
        .add_scheduler_entry("@every 24h", "email:digest", now + ChronoDuration::hours(24))
        .await;
    for hours in [48, 24] {
        let task = inspector.enqueue(queue, "email:digest", Vec::new()).await;
        inspector
            .record_enqueue_event(&entry, task, now - ChronoDuration::hours(hours))
            .await;
    }
}

async fn run_demo(config: AdminConfig, queue_name: &str, retry: u32) -> Result<(), AdminError> {
    let queue = QueueName::parse(queue_name)?;
    let inspector = Arc::new(InMemoryInspector::new());
    let console: AdminConsole = ConsoleBuilder::new()
        .inspector(inspector.clone())
        .diagnostics(Arc::new(StaticDiagnostics::from_info_text(
            "redis_version:in-memory\r\nredis_mode:standalone\r\n",
        )))
        .config(config)
        .build()
        .map_err(|e| AdminError::validation("config", e.to_string()))?;

    seed(&inspector, &queue, retry).await;
    info!(queue = %queue, retry, "Seeded demo store");

    let worker = tokio::spawn(worker_loop(inspector.clone(), queue.clone()));
    sleep(Duration::from_millis(120)).await;

    print_json("queues", &console.list_queues().await?);
    print_json("retry tasks", &console.list_tasks(queue_name, "retry", Some(1), Some(3)).await?);

    let scheduled = console.list_tasks(queue_name, "scheduled", None, None).await?;
    if let Some(key) = scheduled.tasks.first().and_then(|row| row.key.as_ref()) {
        console.run_task(queue_name, "scheduled", &key.to_string()).await?;
        print_json("ran scheduled task", key);
        print_rejection(
            "run the same key again",
            console.run_task(queue_name, "scheduled", &key.to_string()).await,
        );
    }

    print_json("kill all retry", &console.kill_all(queue_name, "retry").await?);
    print_rejection(
        "run an archived task",
        console.run_task(queue_name, "archived", "a:nope:0").await,
    );

    print_json("pause", &console.pause_queue(queue_name).await?);
    print_json("pause again", &console.pause_queue(queue_name).await?);
    print_json("cancel all active", &console.cancel_all(queue_name).await?);
    print_json("resume", &console.resume_queue(queue_name).await?);

    worker.abort();

    print_json("hourly stats", &console.queue_stats(None, "hour", 3).await?);
    print_json("scheduler entries", &console.list_scheduler_entries().await?);
    print_rejection("delete a busy queue", console.delete_queue(queue_name).await);
    print_json("store info", &console.store_info().await?);

    console.close().await
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(a: &[&str]) -> Vec<String> {
        a.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_parse_no_command() {
        let result = parse_args_from_vec(&args(&["spindle"]));
        assert_eq!(result.unwrap_err(), "No command specified");
    }

    #[test]
    fn test_parse_unknown_command() {
        let result = parse_args_from_vec(&args(&["spindle", "explode"]));
        assert!(result.unwrap_err().contains("Unknown command"));
    }

    #[test]
    fn test_parse_help() {
        for flag in ["help", "--help", "-h"] {
            let result = parse_args_from_vec(&args(&["spindle", flag]));
            assert_eq!(result.unwrap(), Command::Help);
        }
    }

    #[test]
    fn test_parse_demo_defaults() {
        let result = parse_args_from_vec(&args(&["spindle", "demo"]));
        assert_eq!(
            result.unwrap(),
            Command::Demo {
                queue: "email".to_string(),
                retry: 5
            }
        );
    }

    #[test]
    fn test_parse_demo_options() {
        let result =
            parse_args_from_vec(&args(&["spindle", "demo", "--queue", "billing", "--retry", "9"]));
        assert_eq!(
            result.unwrap(),
            Command::Demo {
                queue: "billing".to_string(),
                retry: 9
            }
        );
    }

    #[test]
    fn test_parse_demo_bad_retry() {
        let result = parse_args_from_vec(&args(&["spindle", "demo", "--retry", "many"]));
        assert!(result.unwrap_err().contains("--retry must be a number"));

        let result = parse_args_from_vec(&args(&["spindle", "demo", "--queue"]));
        assert_eq!(result.unwrap_err(), "--queue requires a name");
    }

    #[test]
    fn test_parse_store_info_takes_no_arguments() {
        assert_eq!(
            parse_args_from_vec(&args(&["spindle", "store-info"])).unwrap(),
            Command::StoreInfo
        );
        assert!(parse_args_from_vec(&args(&["spindle", "store-info", "--verbose"])).is_err());
    }

    #[tokio::test]
    async fn test_demo_runs_against_memory_store() {
        let result = run_demo(AdminConfig::default(), "email", 3).await;
        assert!(result.is_ok(), "{result:?}");
    }
}
