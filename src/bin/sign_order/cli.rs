//! Command line arguments of the signer.

use std::path::PathBuf;

use bjx_sdk::{
    error::Error,
    num,
    types::{CancelSignRequest, MarketId, OrderSignRequest, Outcome, Side, SignRequest},
};
use clap::{Parser, ValueEnum};
use fastnum::UD128;

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum SignType {
    Order,
    Cancel,
}

/// CLI arguments of the signer.
#[derive(Debug, Parser)]
#[command(name = "sign_order")]
#[command(about = "Sign orders (EIP-712) or cancel messages (EIP-191) without submitting them")]
pub struct CliConfig {
    /// What to sign
    #[arg(long = "type", value_enum)]
    pub sign_type: SignType,

    /// Market ID (for order)
    #[arg(long)]
    pub market_id: Option<MarketId>,

    /// Order side, buy or sell (for order)
    #[arg(long)]
    pub side: Option<Side>,

    /// YES or NO shares (for order)
    #[arg(long)]
    pub outcome: Option<Outcome>,

    /// Price as decimal, strictly between 0 and 1 (for order)
    #[arg(long)]
    pub price: Option<String>,

    /// Amount in USDC (for order, default: DEFAULT_ORDER_SIZE_USDC)
    #[arg(long)]
    pub amount: Option<String>,

    /// Order nonce (default: timestamp ms)
    #[arg(long)]
    pub nonce: Option<u64>,

    /// Expiry unix timestamp (default: +1 hour)
    #[arg(long)]
    pub expiry: Option<u64>,

    /// Order ID to cancel (for cancel)
    #[arg(long)]
    pub order_id: Option<String>,

    /// Directory holding config.json and agent*.env
    #[arg(long, default_value = ".")]
    pub config_dir: PathBuf,
}

/// Argument errors.
#[derive(Debug, thiserror::Error)]
pub enum CliError {
    #[error("Order signing requires: --market-id, --side, --outcome, --price")]
    IncompleteOrder,

    #[error("Cancel signing requires: --order-id")]
    MissingOrderId,

    #[error(transparent)]
    Sdk(#[from] Error),
}

impl CliConfig {
    /// Converts the arguments into a signing request.
    pub fn to_request(&self, default_order_size: UD128) -> Result<SignRequest, CliError> {
        match self.sign_type {
            SignType::Order => {
                let (Some(market_id), Some(side), Some(outcome), Some(price)) =
                    (self.market_id, self.side, self.outcome, self.price.as_deref())
                else {
                    return Err(CliError::IncompleteOrder);
                };
                let price = num::parse_price(price).map_err(Error::from)?;
                let amount = match self.amount.as_deref() {
                    Some(amount) => num::parse_amount(amount).map_err(Error::from)?,
                    None => default_order_size,
                };

                let mut request = OrderSignRequest::new(market_id, side, outcome, price, amount);
                if let Some(nonce) = self.nonce {
                    request = request.with_nonce(nonce);
                }
                if let Some(expiry) = self.expiry {
                    request = request.with_expiry(expiry);
                }
                Ok(request.into())
            }
            SignType::Cancel => match self.order_id.as_deref() {
                Some(order_id) if !order_id.is_empty() => {
                    Ok(CancelSignRequest::new(order_id).into())
                }
                _ => Err(CliError::MissingOrderId),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use bjx_sdk::num::RangeError;
    use fastnum::{udec64, udec128};

    use super::*;

    fn parse(args: &[&str]) -> CliConfig {
        CliConfig::try_parse_from(std::iter::once("sign_order").chain(args.iter().copied()))
            .unwrap()
    }

    #[test]
    fn test_order_request() {
        let cli = parse(&[
            "--type", "order", "--market-id", "1", "--side", "buy", "--outcome", "yes",
            "--price", "0.55", "--amount", "10", "--nonce", "42",
        ]);
        assert_eq!(
            cli.to_request(udec128!(5)).unwrap(),
            SignRequest::Order(
                OrderSignRequest::new(1, Side::Buy, Outcome::Yes, udec64!(0.55), udec128!(10))
                    .with_nonce(42)
            )
        );
    }

    #[test]
    fn test_default_order_size() {
        let cli = parse(&[
            "--type", "order", "--market-id", "2", "--side", "sell", "--outcome", "no",
            "--price", "0.3",
        ]);
        let SignRequest::Order(request) = cli.to_request(udec128!(5)).unwrap() else {
            panic!("order request expected");
        };
        assert_eq!(request.amount(), udec128!(5));
        assert_eq!(request.side(), Side::Sell);
        assert_eq!(request.outcome(), Outcome::No);
        assert_eq!(cli.config_dir, PathBuf::from("."));
    }

    #[test]
    fn test_incomplete_order() {
        let cli = parse(&["--type", "order", "--market-id", "1", "--side", "buy"]);
        assert!(matches!(
            cli.to_request(udec128!(5)),
            Err(CliError::IncompleteOrder)
        ));
    }

    #[test]
    fn test_malformed_price() {
        let cli = parse(&[
            "--type", "order", "--market-id", "1", "--side", "buy", "--outcome", "yes",
            "--price", "fifty",
        ]);
        assert!(matches!(
            cli.to_request(udec128!(5)),
            Err(CliError::Sdk(Error::Range(RangeError::Malformed("price", _))))
        ));
    }

    #[test]
    fn test_cancel_request() {
        let cli = parse(&["--type", "cancel", "--order-id", "ord-42"]);
        assert_eq!(
            cli.to_request(udec128!(5)).unwrap(),
            SignRequest::Cancel(CancelSignRequest::new("ord-42"))
        );

        let cli = parse(&["--type", "cancel"]);
        assert!(matches!(
            cli.to_request(udec128!(5)),
            Err(CliError::MissingOrderId)
        ));
    }

    #[test]
    fn test_rejects_unknown_values() {
        let args = ["sign_order", "--type", "order", "--side", "hold"];
        assert!(CliConfig::try_parse_from(args).is_err());
        assert!(CliConfig::try_parse_from(["sign_order", "--type", "transfer"]).is_err());
    }
}
