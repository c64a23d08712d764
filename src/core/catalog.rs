use super::types::LifestyleTier;

/// Bundled lifestyle tiers, cheapest first.
pub static LIFESTYLE_CATALOG: [LifestyleTier; 8] = [
    LifestyleTier {
        name: "Survival",
        icon: "🍜",
        description: "Basic food and shelter",
        color: "#8b5cf6",
        monthly_cost: 3_000.0,
    },
    LifestyleTier {
        name: "Modest",
        icon: "🏡",
        description: "Settled and comfortable, occasional travel",
        color: "#06b6d4",
        monthly_cost: 10_000.0,
    },
    LifestyleTier {
        name: "Comfortable",
        icon: "🚗",
        description: "High quality of life, car and home covered",
        color: "#10b981",
        monthly_cost: 30_000.0,
    },
    LifestyleTier {
        name: "Quality",
        icon: "🍷",
        description: "Light luxury, premium healthcare",
        color: "#f59e0b",
        monthly_cost: 60_000.0,
    },
    LifestyleTier {
        name: "Affluent",
        icon: "💼",
        description: "Financial freedom, living abroad at will",
        color: "#f97316",
        monthly_cost: 120_000.0,
    },
    LifestyleTier {
        name: "Luxury",
        icon: "💎",
        description: "Top-tier living, bespoke services",
        color: "#ef4444",
        monthly_cost: 250_000.0,
    },
    LifestyleTier {
        name: "Dynastic",
        icon: "👑",
        description: "Family legacy and asset allocation",
        color: "#ec4899",
        monthly_cost: 500_000.0,
    },
    LifestyleTier {
        name: "Boundless",
        icon: "🌌",
        description: "Unlimited possibilities, giving back",
        color: "#fbbf24",
        monthly_cost: 1_000_000.0,
    },
];

pub fn lifestyle_catalog() -> &'static [LifestyleTier] {
    &LIFESTYLE_CATALOG
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn catalog_has_eight_strictly_increasing_tiers() {
        let catalog = lifestyle_catalog();
        assert_eq!(catalog.len(), 8);
        for pair in catalog.windows(2) {
            assert!(
                pair[0].monthly_cost < pair[1].monthly_cost,
                "{} should cost less than {}",
                pair[0].name,
                pair[1].name
            );
        }
    }

    #[test]
    fn catalog_costs_match_bundled_table() {
        let costs: Vec<f64> = lifestyle_catalog().iter().map(|t| t.monthly_cost).collect();
        assert_eq!(
            costs,
            vec![
                3_000.0,
                10_000.0,
                30_000.0,
                60_000.0,
                120_000.0,
                250_000.0,
                500_000.0,
                1_000_000.0
            ]
        );
    }
}
