use anyhow::Result;
use reqwest::Client;
use tracing::{info, warn};

use daily_verse::{
    Action, handler, logging, services::Services, tui::{self, EventHandler, Tui}, ui, Config,
    Controller, FileStore, KeyValueStore, MemoryStore, PassageClient, VerseClient,
};

#[tokio::main]
async fn main() -> Result<()> {
    let (config, config_error) = Config::load_or_default();

    // Logging is optional: the app still runs if the log file cannot be opened.
    match logging::init(&config) {
        Ok(path) => info!(log = %path.display(), "daily-verse v{} starting", env!("CARGO_PKG_VERSION")),
        Err(e) => eprintln!("logging disabled: {}", e),
    }
    if let Some(e) = config_error {
        warn!(error = %format!("{:#}", e), "config file ignored, using defaults");
    }

    let store = open_store(&config);

    tui::install_panic_hook();
    let mut terminal = tui::init()?;

    let result = run(&mut terminal, &config, store).await;

    tui::restore()?;
    result
}

fn open_store(config: &Config) -> Box<dyn KeyValueStore + Send> {
    match config.storage_path() {
        Ok(path) => {
            info!(path = %path.display(), "using preference store");
            Box::new(FileStore::open(path))
        }
        Err(e) => {
            warn!(error = %e, "preferences will not be saved");
            Box::new(MemoryStore::new())
        }
    }
}

async fn run(terminal: &mut Tui, config: &Config, store: Box<dyn KeyValueStore + Send>) -> Result<()> {
    let mut events = EventHandler::new();

    let client = Client::builder()
        .user_agent(concat!("daily-verse/", env!("CARGO_PKG_VERSION")))
        .build()?;
    let services = Services::new(
        VerseClient::new(client.clone(), config.verse_url()),
        PassageClient::new(client, config.passage_url()),
        events.sender(),
    );

    let (mut controller, effects) = Controller::mount(store);
    services.run_all(effects);

    loop {
        let mut layout = None;
        terminal.draw(|frame| layout = ui::render(controller.state(), frame))?;

        if let Some(layout) = layout.filter(|l| *l != controller.state().passage.layout) {
            controller.dispatch(Action::PassageMeasured(layout));
        }

        if controller.state().should_quit {
            break;
        }

        let Some(event) = events.next().await else {
            break;
        };

        if let Some(action) = handler::handle_event(controller.state(), event) {
            let effects = controller.dispatch(action);
            services.run_all(effects);
        }
    }

    info!("shutting down");
    Ok(())
}
