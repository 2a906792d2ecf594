use std::sync::Arc;

use anyhow::Context;
use dotenvy::dotenv;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::runtime::Handle;
use tracing::{error, info};
use tracing_appender::rolling;

use hrm_attendance::api::HttpAttendanceApi;
use hrm_attendance::command::{Command, HELP};
use hrm_attendance::config::Config;
use hrm_attendance::controller::AttendanceController;
use hrm_attendance::model::AttendanceQuery;
use hrm_attendance::render::TerminalSink;
use hrm_attendance::render::history::history_table;
use hrm_attendance::timer::{AttendanceTimer, SystemClock, TokioScheduler};

type Controller = AttendanceController<HttpAttendanceApi, TokioScheduler>;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv().ok();

    let config = Config::from_env().context("invalid configuration")?;

    // Rolling daily log; the terminal belongs to the widget
    let file_appender = rolling::daily(&config.log_dir, "attendance.log");
    let (non_blocking, _guard) = tracing_appender::non_blocking(file_appender);

    tracing_subscriber::fmt()
        .with_writer(non_blocking)
        .with_max_level(config.log_level)
        .with_ansi(false)
        .with_target(false) // removes module path
        .with_level(true)
        .with_thread_ids(false)
        .with_thread_names(false)
        .init();

    info!(api_url = %config.api_url, "Attendance widget starting...");

    let api = HttpAttendanceApi::from_config(&config).context("cannot build API client")?;
    let sink = Arc::new(TerminalSink::stdout());
    let timer = AttendanceTimer::new(
        TokioScheduler::new(Handle::current()),
        Arc::new(SystemClock),
        sink.clone(),
    )
    .with_period(config.tick_interval);
    let mut controller = AttendanceController::new(api, timer);

    println!("{HELP}");
    if let Err(e) = controller.load_today().await {
        sink.newline();
        println!("Could not load today's attendance: {}", e.user_message());
    }

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        tokio::select! {
            _ = tokio::signal::ctrl_c() => break,
            line = lines.next_line() => {
                let Some(line) = line? else { break };
                match Command::parse(&line) {
                    Ok(Some(Command::Quit)) => break,
                    Ok(Some(command)) => run(&mut controller, &sink, command).await,
                    Ok(None) => {}
                    Err(message) => {
                        sink.newline();
                        println!("{message}\n{HELP}");
                    }
                }
            }
        }
    }

    drop(controller);
    sink.newline();
    info!("Attendance widget stopped");
    Ok(())
}

async fn run(
    controller: &mut Controller,
    sink: &TerminalSink<std::io::Stdout>,
    command: Command,
) {
    let outcome = match command.clone() {
        Command::ClockIn => controller
            .clock_in()
            .await
            .map(|_| Some("Clocked in successfully!".to_string())),
        Command::ClockOut => controller
            .clock_out()
            .await
            .map(|_| Some("Clocked out successfully!".to_string())),
        Command::Refresh => controller.load_today().await.map(|_| None),
        Command::History { page } => controller
            .load_attendance(&AttendanceQuery::page(page))
            .await
            .map(|page| Some(history_table(&page))),
        Command::View(section) => controller.show_section(section).await.map(|_| None),
        Command::Logout => {
            controller.logout();
            Ok(None)
        }
        Command::Help => Ok(Some(HELP.to_string())),
        Command::Quit => Ok(None),
    };

    match outcome {
        Ok(Some(message)) => {
            sink.newline();
            println!("{message}");
        }
        Ok(None) => {}
        Err(e) => {
            error!(error = %e, ?command, "Command failed");
            sink.newline();
            println!("{}", e.user_message());
        }
    }
}
