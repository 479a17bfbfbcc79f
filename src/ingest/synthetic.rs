use crate::data::Transaction;
use chrono::{Duration, NaiveDate};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use rust_decimal::Decimal;

const INVESTORS: &[&str] = &[
    "Peach State Homes LLC",
    "Red Clay Properties Inc",
    "Atlas Renovation Corp",
    "Smith Family Trust",
    "Marcus Bell",
    "Southern Crest Ltd",
];

const STREETS: &[&str] = &["Oak", "Peachtree", "Magnolia", "Pine", "Dogwood", "Maple"];

/// Parameters for generated sale histories
#[derive(Debug, Clone)]
pub struct SyntheticConfig {
    pub properties: usize,
    pub county: String,
    pub city: String,
    /// Earliest possible first sale
    pub start: NaiveDate,
    /// Share of properties bought by an investor
    pub investor_share: f64,
    pub seed: u64,
}

impl Default for SyntheticConfig {
    fn default() -> Self {
        Self {
            properties: 1000,
            county: "Fulton".to_string(),
            city: "Atlanta".to_string(),
            start: NaiveDate::from_ymd_opt(2022, 1, 1).unwrap_or_default(),
            investor_share: 0.3,
            seed: 42,
        }
    }
}

/// Generate plausible sale histories: every property has an initial sale, investor
/// purchases are resold after a renovation period, owner-occupied homes sometimes resell.
///
/// The same config always produces the same records.
pub fn generate_sales(config: &SyntheticConfig) -> Vec<Transaction> {
    let mut rng = StdRng::seed_from_u64(config.seed);
    let prefix: String = config
        .county
        .chars()
        .filter(|c| c.is_ascii_alphabetic())
        .take(3)
        .collect::<String>()
        .to_uppercase();

    let mut sales = Vec::with_capacity(config.properties * 2);

    for i in 0..config.properties {
        let property_id = format!("{}-{:06}", prefix, i);
        let street = STREETS.choose(&mut rng).copied().unwrap_or("Main");
        let address = format!(
            "{} {} St, {}, GA 30{:03}",
            rng.gen_range(100..9999),
            street,
            config.city,
            rng.gen_range(0..400)
        );

        let sale = |date: NaiveDate, price: i64, buyer: String, seller: String| Transaction {
            property_id: property_id.clone(),
            address: address.clone(),
            sale_date: date,
            sale_price: Decimal::from(price),
            buyer,
            seller,
            county: config.county.clone(),
        };

        let first_date = config.start + Duration::days(rng.gen_range(0..365));
        // Whole thousands, like recorded deeds
        let first_price = rng.gen_range(150..600) * 1000;

        if rng.gen_bool(config.investor_share.clamp(0.0, 1.0)) {
            let investor = INVESTORS.choose(&mut rng).copied().unwrap_or("Marcus Bell");
            let hold = rng.gen_range(20..420);
            let markup = rng.gen_range(40..180) * 1000;

            sales.push(sale(first_date, first_price, investor.to_string(), format!("Owner {}", i)));
            sales.push(sale(
                first_date + Duration::days(hold),
                first_price + markup,
                format!("Homebuyer {}", i),
                investor.to_string(),
            ));
        } else {
            sales.push(sale(first_date, first_price, format!("Resident {}", i), format!("Owner {}", i)));

            if rng.gen_bool(0.2) {
                let hold = rng.gen_range(365..1500);
                let appreciation = rng.gen_range(0..60) * 1000;
                sales.push(sale(
                    first_date + Duration::days(hold),
                    first_price + appreciation,
                    format!("Homebuyer {}", i),
                    format!("Resident {}", i),
                ));
            }
        }
    }

    sales
}
