//! `stockia-cli`: record one stock movement against a Stockia backend.
//!
//! ```text
//! stockia-cli <product-id> <in|out> <quantity> [--cost <amount>] [--reason <text>] [--supplier <name>]
//! ```
//!
//! Configuration comes from the `STOCKIA_*` environment variables. Without
//! `STOCKIA_AUTH_TOKEN`, `STOCKIA_EMAIL` and `STOCKIA_PASSWORD` are used to
//! sign in.

use std::sync::Arc;

use anyhow::{Context, Result, bail};

use stockia_client::{AppContext, ClientConfig, Credentials, HttpBackend};
use stockia_core::ProductId;
use stockia_inventory::{MovementDirection, MovementForm};

const USAGE: &str = "usage: stockia-cli <product-id> <in|out> <quantity> [--cost <amount>] [--reason <text>] [--supplier <name>]";

#[derive(Debug, PartialEq, Eq)]
struct CliArgs {
    product_id: ProductId,
    form: MovementForm,
}

fn parse_args<I>(args: I) -> Result<CliArgs>
where
    I: IntoIterator<Item = String>,
{
    let mut args = args.into_iter();
    let (Some(product), Some(direction), Some(quantity)) = (args.next(), args.next(), args.next())
    else {
        bail!(USAGE);
    };

    let product_id: ProductId = product.parse().context("invalid product id")?;
    let direction: MovementDirection = direction.parse().context("invalid direction")?;
    let mut form = MovementForm::new(direction).quantity(quantity);

    while let Some(flag) = args.next() {
        let Some(value) = args.next() else {
            bail!("{flag} needs a value\n{USAGE}");
        };
        form = match flag.as_str() {
            "--cost" => form.cost(value),
            "--reason" => form.reason(value),
            "--supplier" => form.supplier(value),
            other => bail!("unknown option {other}\n{USAGE}"),
        };
    }

    // Cost only matters for purchases.
    if form.cost.is_none() && direction == MovementDirection::Out {
        form = form.cost("0");
    }

    Ok(CliArgs { product_id, form })
}

#[tokio::main]
async fn main() -> Result<()> {
    stockia_observability::init();

    let args = parse_args(std::env::args().skip(1))?;
    let config = ClientConfig::from_env().context("invalid configuration")?;
    let backend = Arc::new(HttpBackend::new(&config).context("failed to build HTTP client")?);
    let ctx = AppContext::new(backend, config);

    if !ctx.is_authenticated().await {
        let email = std::env::var("STOCKIA_EMAIL")
            .context("set STOCKIA_AUTH_TOKEN, or STOCKIA_EMAIL and STOCKIA_PASSWORD")?;
        let password = std::env::var("STOCKIA_PASSWORD").context("STOCKIA_PASSWORD is not set")?;
        ctx.login(&Credentials::new(email, password))
            .await
            .context("login failed")?;
    }

    let product = ctx
        .fetch_product(args.product_id)
        .await
        .context("failed to load product")?;
    tracing::info!(product = %product.name, stock = product.current_stock, "product loaded");

    let movement = match ctx.validate_movement(args.product_id, &args.form).await {
        Ok(movement) => movement,
        Err(errors) => {
            for error in &errors {
                eprintln!("{error}");
            }
            bail!("{} invalid field(s)", errors.len());
        }
    };
    let expected = movement.preview(product.current_stock);

    match ctx.submit_movement(&movement).await {
        Ok(submitted) => match submitted.resulting_stock() {
            Some(stock) => println!("{}: stock is now {stock}", product.name),
            None => println!(
                "{}: movement recorded, stock not confirmed (expected {expected})",
                product.name
            ),
        },
        Err(err) => bail!("{}", err.user_message()),
    }

    Ok(())
}
