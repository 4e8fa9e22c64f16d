//! Fixture data written by the seed workflow
//!
//! Services reference providers, and options reference services, by their
//! position in the catalog.

use rust_decimal::Decimal;

/// Radius given to every seeded service location
pub const SEEDED_SERVICE_RANGE_MI: f64 = 15.0;

#[derive(Debug, Clone)]
pub struct ProviderSeed {
    pub name: String,
    pub description: String,
    pub contact_email: String,
    pub phone_number: String,
}

#[derive(Debug, Clone)]
pub struct ServiceSeed {
    /// Index into [`SeedCatalog::providers`]
    pub provider: usize,
    pub name: String,
    pub category: String,
    pub description: String,
    pub price: Decimal,
}

#[derive(Debug, Clone)]
pub struct OptionValueSeed {
    pub name: String,
    pub additional_price: Decimal,
}

#[derive(Debug, Clone)]
pub struct OptionSeed {
    /// Index into [`SeedCatalog::services`]
    pub service: usize,
    pub name: String,
    pub is_required: bool,
    pub max_selections: Option<i32>,
    pub values: Vec<OptionValueSeed>,
}

/// Providers, services and options written by one seed run.
#[derive(Debug, Clone)]
pub struct SeedCatalog {
    pub providers: Vec<ProviderSeed>,
    pub services: Vec<ServiceSeed>,
    pub options: Vec<OptionSeed>,
    pub service_range_mi: f64,
}

fn provider(name: &str, description: &str, contact_email: &str, phone_number: &str) -> ProviderSeed {
    ProviderSeed {
        name: name.to_string(),
        description: description.to_string(),
        contact_email: contact_email.to_string(),
        phone_number: phone_number.to_string(),
    }
}

fn service(provider: usize, name: &str, category: &str, description: &str, dollars: i64) -> ServiceSeed {
    ServiceSeed {
        provider,
        name: name.to_string(),
        category: category.to_string(),
        description: description.to_string(),
        price: Decimal::new(dollars * 100, 2),
    }
}

fn single_choice(service: usize, name: &str, values: &[(&str, i64)]) -> OptionSeed {
    OptionSeed {
        service,
        name: name.to_string(),
        is_required: true,
        max_selections: Some(1),
        values: values
            .iter()
            .map(|(name, dollars)| OptionValueSeed {
                name: name.to_string(),
                additional_price: Decimal::new(dollars * 100, 2),
            })
            .collect(),
    }
}

impl SeedCatalog {
    /// The demo marketplace: three providers, six services, three options.
    pub fn standard() -> Self {
        let providers = vec![
            provider(
                "Green Thumb Landscaping",
                "Expert landscaping and lawn care services.",
                "greenthumb@example.com",
                "123-456-7890",
            ),
            provider(
                "QuickMove Services",
                "Reliable moving and packing services.",
                "quickmove@example.com",
                "987-654-3210",
            ),
            provider(
                "Style Studio Salon",
                "Professional hair and beauty services.",
                "stylestudio@example.com",
                "555-555-5555",
            ),
        ];

        let services = vec![
            service(0, "Lawn Mowing", "Landscaping", "Mow and edge your lawn to perfection.", 50),
            service(0, "Garden Maintenance", "Landscaping", "Keep your garden neat and healthy.", 80),
            service(1, "Local Moving", "Moving", "Move your belongings within the city.", 150),
            service(1, "Packing Service", "Moving", "Professional packing for a stress-free move.", 75),
            service(2, "Haircut", "Hair Services", "Get a fresh new look.", 30),
            service(2, "Hair Coloring", "Hair Services", "Professional hair coloring services.", 100),
        ];

        let options = vec![
            single_choice(0, "Grass Height", &[("Short", 0), ("Medium", 5), ("Tall", 10)]),
            single_choice(1, "Maintenance Type", &[("Weeding", 20), ("Pruning", 15)]),
            single_choice(4, "Hair Length", &[("Short", 0), ("Medium", 5), ("Long", 10)]),
        ];

        Self {
            providers,
            services,
            options,
            service_range_mi: SEEDED_SERVICE_RANGE_MI,
        }
    }

    pub fn value_count(&self) -> usize {
        self.options.iter().map(|option| option.values.len()).sum()
    }
}
