use std::sync::Arc;

use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::broadcast::error::RecvError;
use tokio::task::JoinSet;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use planboard_app::config::AppConfig;
use planboard_app::coordinator::Coordinator;
use planboard_app::shell::{self, Outcome};
use planboard_app::view;
use planboard_client::ProjectsApi;
use planboard_sync::ProjectStore;

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    // --- Tracing (stderr, so it never interleaves with the screen) ---
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                "planboard=info,planboard_app=info,planboard_sync=info,planboard_client=info".into()
            }),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    // --- Configuration ---
    let config = AppConfig::from_env();
    tracing::info!(
        api_url = %config.client.api_url,
        timeout_secs = ?config.client.timeout_secs,
        "Loaded client configuration"
    );

    // --- Store ---
    let api = ProjectsApi::from_config(&config.client).expect("Failed to build HTTP client");
    let store = Arc::new(ProjectStore::new(Arc::new(api)));
    let mut events = store.subscribe();

    let mut coordinator = Coordinator::new(Arc::clone(&store), config.date_format);
    let mut in_flight = JoinSet::new();
    in_flight.spawn(coordinator.start());

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    redraw(&coordinator).await;

    loop {
        tokio::select! {
            line = lines.next_line() => {
                let line = match line {
                    Ok(Some(line)) => line,
                    Ok(None) => break,
                    Err(e) => {
                        tracing::error!(error = %e, "Failed to read input");
                        break;
                    }
                };
                match handle_line(&mut coordinator, &line).await {
                    Some(Outcome::Spawn(op)) => {
                        in_flight.spawn(op);
                    }
                    Some(Outcome::Help) => println!("{}", shell::HELP),
                    Some(Outcome::Quit) => break,
                    Some(Outcome::Continue) | None => {}
                }
                redraw(&coordinator).await;
            }
            Some(joined) = in_flight.join_next() => {
                match joined {
                    Ok(completion) => {
                        if coordinator.complete(completion) {
                            redraw(&coordinator).await;
                        }
                    }
                    Err(e) => tracing::error!(error = %e, "Remote operation task failed"),
                }
            }
            event = events.recv() => match event {
                Ok(event) => {
                    tracing::debug!(?event, "Store event");
                    redraw(&coordinator).await;
                }
                Err(RecvError::Lagged(skipped)) => {
                    tracing::warn!(skipped, "Store event subscriber lagged");
                    redraw(&coordinator).await;
                }
                Err(RecvError::Closed) => break,
            },
        }
    }

    // Requests still outstanding are abandoned; their results would only
    // update a screen that is gone.
    let abandoned = in_flight.len();
    in_flight.abort_all();
    tracing::info!(abandoned, "Exiting");
}

/// Parse and run one input line. Errors go to the banner.
async fn handle_line(coordinator: &mut Coordinator, line: &str) -> Option<Outcome> {
    let command = match shell::parse(line) {
        Ok(Some(command)) => command,
        Ok(None) => return None,
        Err(e) => {
            coordinator.report(&e.into());
            return None;
        }
    };
    match shell::execute(coordinator, command).await {
        Ok(outcome) => Some(outcome),
        Err(e) => {
            coordinator.report(&e);
            None
        }
    }
}

async fn redraw(coordinator: &Coordinator) {
    print!("{}", view::render(&coordinator.view().await));
    println!("> ");
}
