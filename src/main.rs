use opsboard::app::{Dashboard, Message, RenderTargets};
use opsboard::config::Config;
use opsboard::core::settings;
use opsboard::http::ApiClient;
use opsboard::pages::charts::ChartsAction;
use opsboard::pages::operations::OperationsAction;
use opsboard::pages::resources::ResourcesAction;
use opsboard::render::console;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::mpsc::UnboundedSender;

fn main() -> anyhow::Result<()> {
    settings::init();
    let config = Config::load()?;
    log::info!("dashboard starting against {}", config.backend_url);

    let api = ApiClient::new(&config.backend_url, config.request_timeout())?;
    let (operations, resources, charts) = console::targets();
    let targets = RenderTargets {
        operations,
        resources,
        charts,
    };

    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?;
    let local = tokio::task::LocalSet::new();
    runtime.block_on(local.run_until(async move {
        let (dashboard, tx, rx) = Dashboard::new(config, api, targets);
        tokio::task::spawn_local(read_commands(tx));
        dashboard.run(rx).await;
    }));
    Ok(())
}

/// Maps stdin lines onto dashboard messages, standing in for the page's
/// buttons: `filter <TYPE|ALL>`, `refresh`, `charts`, `quit`.
async fn read_commands(tx: UnboundedSender<Message>) {
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Ok(Some(line)) = lines.next_line().await {
        let line = line.trim();
        let message = match line.split_once(' ') {
            Some(("filter", rest)) => {
                Message::Operations(OperationsAction::Filter(rest.to_string()))
            }
            None if line == "refresh" => {
                Message::Resources(ResourcesAction::Refresh { force: true })
            }
            None if line == "charts" => Message::Charts(ChartsAction::Refresh),
            None if line == "quit" || line == "exit" => Message::Shutdown,
            None if line.is_empty() => continue,
            _ => {
                eprintln!("commands: filter <TYPE|ALL>, refresh, charts, quit");
                continue;
            }
        };
        let stop = matches!(message, Message::Shutdown);
        if tx.send(message).is_err() || stop {
            break;
        }
    }
}
