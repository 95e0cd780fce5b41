//! Synthetic order generation
//!
//! Produces a deterministic table of warehouse orders for a seed. Each order
//! is assigned to process A or B by an independent uniform draw, then its
//! measurements are drawn from the group's profile:
//!
//! | Group | Time (min)  | Cost        | Error rate | On-time rate |
//! |-------|-------------|-------------|------------|--------------|
//! | A     | N(32, 6)    | N(18, 3)    | 6%         | 92%          |
//! | B     | N(27, 5)    | N(15, 2.5)  | 3%         | 96%          |
//!
//! Time and cost are clamped to [`MIN_MEASUREMENT`].

use chrono::{Duration, NaiveDate};
use log::debug;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use thiserror::Error;

use crate::entities::{Order, ProcessGroup, MIN_MEASUREMENT};

/// Parameters for a generation run
#[derive(Debug, Clone, PartialEq)]
pub struct GeneratorConfig {
    /// Number of calendar days to cover
    pub days: u32,

    /// First order date
    pub start_date: NaiveDate,

    /// Minimum orders per day (inclusive)
    pub min_orders_per_day: u32,

    /// Maximum orders per day (exclusive)
    pub max_orders_per_day: u32,

    pub seed: u64,

    pub warehouse_id: String,

    /// Pickers are named `P_1..=P_<picker_count>`
    pub picker_count: u32,

    /// Items per order are drawn from `1..max_items` (exclusive)
    pub max_items: u32,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            days: 60,
            start_date: NaiveDate::from_ymd_opt(2024, 1, 1).unwrap_or_default(),
            min_orders_per_day: 80,
            max_orders_per_day: 120,
            seed: 42,
            warehouse_id: "WH_01".to_string(),
            picker_count: 20,
            max_items: 20,
        }
    }
}

impl GeneratorConfig {
    /// Check the parameters describe a non-empty run
    pub fn validate(&self) -> Result<(), GeneratorError> {
        if self.days == 0 {
            return Err(GeneratorError::NoDays);
        }
        if self.min_orders_per_day == 0 || self.min_orders_per_day >= self.max_orders_per_day {
            return Err(GeneratorError::InvalidOrderRange {
                min: self.min_orders_per_day,
                max: self.max_orders_per_day,
            });
        }
        if self.picker_count == 0 {
            return Err(GeneratorError::NoPickers);
        }
        if self.max_items < 2 {
            return Err(GeneratorError::InvalidItemRange(self.max_items));
        }
        Ok(())
    }
}

/// Distribution parameters for one process group
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GroupProfile {
    pub time_mean: f64,
    pub time_std: f64,
    pub cost_mean: f64,
    pub cost_std: f64,
    pub error_rate: f64,
    pub on_time_rate: f64,
}

impl GroupProfile {
    pub fn for_group(group: ProcessGroup) -> Self {
        match group {
            ProcessGroup::A => Self {
                time_mean: 32.0,
                time_std: 6.0,
                cost_mean: 18.0,
                cost_std: 3.0,
                error_rate: 0.06,
                on_time_rate: 0.92,
            },
            ProcessGroup::B => Self {
                time_mean: 27.0,
                time_std: 5.0,
                cost_mean: 15.0,
                cost_std: 2.5,
                error_rate: 0.03,
                on_time_rate: 0.96,
            },
        }
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum GeneratorError {
    #[error("day count must be at least 1")]
    NoDays,

    #[error("invalid orders-per-day range {min}..{max} (need 0 < min < max)")]
    InvalidOrderRange { min: u32, max: u32 },

    #[error("picker count must be at least 1")]
    NoPickers,

    #[error("max items must be at least 2 (got {0})")]
    InvalidItemRange(u32),
}

/// Seeded order generator
pub struct OrderGenerator {
    config: GeneratorConfig,
    rng: StdRng,
    next_id: u64,
}

impl OrderGenerator {
    pub fn new(config: GeneratorConfig) -> Result<Self, GeneratorError> {
        config.validate()?;
        let rng = StdRng::seed_from_u64(config.seed);
        Ok(Self {
            config,
            rng,
            next_id: 1,
        })
    }

    /// Generate the full table, day by day
    pub fn generate(mut self) -> Vec<Order> {
        let mut orders = Vec::new();

        for day in 0..self.config.days {
            let date = self.config.start_date + Duration::days(i64::from(day));
            let daily_orders = self
                .rng
                .random_range(self.config.min_orders_per_day..self.config.max_orders_per_day);
            debug!("{}: {} orders", date, daily_orders);

            for _ in 0..daily_orders {
                let order = self.next_order(date);
                orders.push(order);
            }
        }

        orders
    }

    fn next_order(&mut self, date: NaiveDate) -> Order {
        let process_group = if self.rng.random_bool(0.5) {
            ProcessGroup::B
        } else {
            ProcessGroup::A
        };
        let items_count = self.rng.random_range(1..self.config.max_items);

        let profile = GroupProfile::for_group(process_group);
        let processing_time = self.normal(profile.time_mean, profile.time_std);
        let labor_cost = self.normal(profile.cost_mean, profile.cost_std);
        let error_flag = self.rng.random_bool(profile.error_rate);
        let on_time_delivery = self.rng.random_bool(profile.on_time_rate);
        let picker = self.rng.random_range(1..=self.config.picker_count);

        let order = Order {
            order_id: format!("ORD_{}", self.next_id),
            order_date: date,
            process_group,
            warehouse_id: self.config.warehouse_id.clone(),
            picker_id: format!("P_{}", picker),
            items_count,
            processing_time_min: processing_time.max(MIN_MEASUREMENT),
            labor_cost: labor_cost.max(MIN_MEASUREMENT),
            error_flag,
            on_time_delivery,
        };
        self.next_id += 1;
        order
    }

    /// Draw from N(mean, std) using the Box-Muller transform
    fn normal(&mut self, mean: f64, std: f64) -> f64 {
        // 1 - u keeps u1 in (0, 1] so ln() stays finite
        let u1: f64 = 1.0 - self.rng.random::<f64>();
        let u2: f64 = self.rng.random();
        let z = (-2.0_f64 * u1.ln()).sqrt() * (2.0_f64 * std::f64::consts::PI * u2).cos();
        mean + std * z
    }
}

/// Convenience wrapper: validate, seed and generate in one call
pub fn generate_orders(config: GeneratorConfig) -> Result<Vec<Order>, GeneratorError> {
    Ok(OrderGenerator::new(config)?.generate())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn small_config(seed: u64) -> GeneratorConfig {
        GeneratorConfig {
            days: 5,
            min_orders_per_day: 10,
            max_orders_per_day: 20,
            seed,
            ..GeneratorConfig::default()
        }
    }

    #[test]
    fn test_default_config_matches_reference_run() {
        let config = GeneratorConfig::default();
        assert_eq!(config.days, 60);
        assert_eq!(config.start_date.to_string(), "2024-01-01");
        assert_eq!((config.min_orders_per_day, config.max_orders_per_day), (80, 120));
        assert_eq!(config.seed, 42);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_same_seed_is_deterministic() {
        let first = generate_orders(small_config(7)).unwrap();
        let second = generate_orders(small_config(7)).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_different_seed_differs() {
        let first = generate_orders(small_config(1)).unwrap();
        let second = generate_orders(small_config(2)).unwrap();
        assert_ne!(first, second);
    }

    #[test]
    fn test_measurements_are_clamped() {
        for seed in 0..10 {
            for order in generate_orders(small_config(seed)).unwrap() {
                assert!(order.processing_time_min >= MIN_MEASUREMENT);
                assert!(order.labor_cost >= MIN_MEASUREMENT);
            }
        }
    }

    #[test]
    fn test_order_counts_and_dates() {
        let config = small_config(3);
        let orders = generate_orders(config.clone()).unwrap();

        let min_total = (config.days * config.min_orders_per_day) as usize;
        let max_total = (config.days * (config.max_orders_per_day - 1)) as usize;
        assert!(orders.len() >= min_total && orders.len() <= max_total);

        let first = orders.first().unwrap();
        let last = orders.last().unwrap();
        assert_eq!(first.order_date, config.start_date);
        assert_eq!(last.order_date, config.start_date + Duration::days(4));
        assert!(orders.windows(2).all(|w| w[0].order_date <= w[1].order_date));
    }

    #[test]
    fn test_ids_increase_monotonically() {
        let orders = generate_orders(small_config(11)).unwrap();
        for (i, order) in orders.iter().enumerate() {
            assert_eq!(order.order_id, format!("ORD_{}", i + 1));
        }
    }

    #[test]
    fn test_fields_within_ranges() {
        let config = small_config(5);
        for order in generate_orders(config.clone()).unwrap() {
            assert!(order.items_count >= 1 && order.items_count < config.max_items);
            let picker: u32 = order.picker_id.trim_start_matches("P_").parse().unwrap();
            assert!(picker >= 1 && picker <= config.picker_count);
            assert_eq!(order.warehouse_id, "WH_01");
        }
    }

    #[test]
    fn test_both_groups_present_and_b_is_faster() {
        let orders = generate_orders(GeneratorConfig {
            days: 10,
            ..GeneratorConfig::default()
        })
        .unwrap();

        let mean_time = |group: ProcessGroup| {
            let times: Vec<f64> = orders
                .iter()
                .filter(|o| o.process_group == group)
                .map(|o| o.processing_time_min)
                .collect();
            assert!(!times.is_empty());
            times.iter().sum::<f64>() / times.len() as f64
        };

        let a = mean_time(ProcessGroup::A);
        let b = mean_time(ProcessGroup::B);
        assert!((a - 32.0).abs() < 1.5);
        assert!((b - 27.0).abs() < 1.5);
        assert!(b < a);
    }

    #[test]
    fn test_invalid_configs_rejected() {
        let zero_days = GeneratorConfig {
            days: 0,
            ..GeneratorConfig::default()
        };
        assert_eq!(zero_days.validate(), Err(GeneratorError::NoDays));

        let empty_range = GeneratorConfig {
            min_orders_per_day: 50,
            max_orders_per_day: 50,
            ..GeneratorConfig::default()
        };
        assert!(matches!(
            OrderGenerator::new(empty_range),
            Err(GeneratorError::InvalidOrderRange { min: 50, max: 50 })
        ));

        let no_pickers = GeneratorConfig {
            picker_count: 0,
            ..GeneratorConfig::default()
        };
        assert_eq!(no_pickers.validate(), Err(GeneratorError::NoPickers));

        let no_items = GeneratorConfig {
            max_items: 1,
            ..GeneratorConfig::default()
        };
        assert_eq!(no_items.validate(), Err(GeneratorError::InvalidItemRange(1)));
    }
}
