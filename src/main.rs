use clap::Parser;
use small_cart::core::ConfigProvider;
use small_cart::utils::error::ErrorCategory;
use small_cart::utils::{logger, validation::Validate};
use small_cart::{
    Cart, CartAccessor, CartCommand, CartEngine, CartError, CartSettings, CliConfig,
    ConsoleNotifier, HttpStockService, LocalStorage, Messages, ProductId, UpdateProductAmount,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = CliConfig::parse();

    // 有 TOML 設定檔時以設定檔為準
    let toml = match cli.load_toml() {
        Some(Ok(config)) => Some(config),
        Some(Err(e)) => {
            eprintln!("❌ Failed to load config file: {}", e);
            eprintln!("💡 Make sure the file exists and is valid TOML format");
            std::process::exit(1);
        }
        None => None,
    };

    let verbose = cli.verbose || toml.as_ref().map(|t| t.verbose()).unwrap_or(false);
    if cli.json_logs || toml.as_ref().map(|t| t.json_logs()).unwrap_or(false) {
        logger::init_json_logger(verbose);
    } else {
        logger::init_cli_logger(verbose);
    }

    tracing::debug!("CLI config: {:?}", cli);

    let result = match &toml {
        Some(config) => {
            validate_or_exit(config);
            run(config, config.messages(), &cli.command).await
        }
        None => {
            validate_or_exit(&cli);
            run(&cli, Messages::default(), &cli.command).await
        }
    };

    if let Err(e) = result {
        tracing::error!("❌ small-cart failed: {} (Category: {:?})", e, e.category());
        eprintln!("❌ {}", e.user_friendly_message());
        eprintln!("💡 {}", e.recovery_suggestion());

        let exit_code = match e.category() {
            ErrorCategory::Configuration => 1,
            ErrorCategory::Network => 2,
            ErrorCategory::Storage | ErrorCategory::Data => 3,
        };
        std::process::exit(exit_code);
    }

    Ok(())
}

fn validate_or_exit<C: Validate>(config: &C) {
    if let Err(e) = config.validate() {
        tracing::error!("❌ Configuration validation failed: {}", e);
        tracing::error!("💡 Suggestion: {}", e.recovery_suggestion());
        eprintln!("❌ {}", e.user_friendly_message());
        std::process::exit(1);
    }
}

async fn run<C: ConfigProvider>(
    config: &C,
    messages: Messages,
    command: &CartCommand,
) -> Result<(), CartError> {
    let stock = HttpStockService::from_config(config)?;
    let storage = LocalStorage::from_config(config);
    let settings = CartSettings::from_config(config, messages);

    tracing::debug!(
        "Using stock service {} and snapshot {}",
        config.stock_api_url(),
        storage.path_for(config.storage_key()).display()
    );

    let engine = CartEngine::new(stock, storage, ConsoleNotifier, settings).await;
    let cart = CartAccessor::from(engine);

    match *command {
        CartCommand::Show => {}
        CartCommand::Add { product_id } => cart.add_product(ProductId(product_id)).await,
        CartCommand::Remove { product_id } => cart.remove_product(ProductId(product_id)).await,
        CartCommand::Update { product_id, amount } => {
            cart.update_product_amount(UpdateProductAmount {
                product_id: ProductId(product_id),
                amount,
            })
            .await
        }
    }

    print_cart(&cart.cart());
    Ok(())
}

fn print_cart(cart: &Cart) {
    if cart.is_empty() {
        println!("🛒 Cart is empty");
        return;
    }

    println!("🛒 {} item(s), {} unit(s)", cart.len(), cart.total_units());
    for line in cart {
        println!(
            "{:>6}  x{:<4} {}",
            line.id().0,
            line.amount,
            line.product.title().unwrap_or("-")
        );
    }
}
