// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights
// reserved. SPDX-License-Identifier: Proprietary

//! Generated beer catalogue for populating an empty store.

use stockroom_common_product::NewProduct;

const NAME_PREFIXES: &[&str] = &[
	"Old", "Hoppy", "Golden", "Dark", "Wild", "Smoky", "Crooked", "Iron", "Silver", "Lazy",
	"Bitter", "Velvet", "Northern", "Rusty", "Midnight", "Foggy",
];

const NAME_SUFFIXES: &[&str] = &[
	"Badger", "Anchor", "Lantern", "Harvest", "Monk", "Fox", "Barrel", "Mill", "River", "Owl",
	"Hammer", "Orchard", "Crown", "Stag", "Tide", "Ember",
];

const STYLES: &[&str] = &[
	"Lager",
	"Pilsner",
	"Ale",
	"India Pale Ale",
	"Stout",
	"Porter",
	"Wheat Beer",
	"Saison",
	"Bock",
	"Sour Ale",
	"Amber Ale",
	"Barley Wine",
];

const MIN_PRICE: f64 = 100.0;
const MAX_PRICE: f64 = 1000.0;

/// Produces plausible products from a seedable RNG so seeded catalogues are
/// reproducible.
pub struct ProductGenerator {
	rng: fastrand::Rng,
}

impl ProductGenerator {
	pub fn new() -> Self {
		Self {
			rng: fastrand::Rng::new(),
		}
	}

	pub fn with_seed(seed: u64) -> Self {
		Self {
			rng: fastrand::Rng::with_seed(seed),
		}
	}

	/// A product named "<prefix> <suffix>", a beer style as category, and a
	/// price in `[100, 1000)` rounded to cents.
	pub fn next_product(&mut self) -> NewProduct {
		let name = format!(
			"{} {}",
			NAME_PREFIXES[self.rng.usize(..NAME_PREFIXES.len())],
			NAME_SUFFIXES[self.rng.usize(..NAME_SUFFIXES.len())]
		);
		let category = STYLES[self.rng.usize(..STYLES.len())];
		let raw = MIN_PRICE + self.rng.f64() * (MAX_PRICE - MIN_PRICE);
		let price = ((raw * 100.0).floor() / 100.0).min(MAX_PRICE - 0.01);

		NewProduct::new(name, category, price)
	}
}

impl Default for ProductGenerator {
	fn default() -> Self {
		Self::new()
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn same_seed_same_catalogue() {
		let mut a = ProductGenerator::with_seed(42);
		let mut b = ProductGenerator::with_seed(42);
		for _ in 0..20 {
			assert_eq!(a.next_product(), b.next_product());
		}
	}

	#[test]
	fn prices_are_in_range_with_two_decimals() {
		let mut generator = ProductGenerator::with_seed(1);
		for _ in 0..500 {
			let p = generator.next_product();
			assert!((MIN_PRICE..MAX_PRICE).contains(&p.price), "price {}", p.price);
			let cents = p.price * 100.0;
			assert!((cents - cents.round()).abs() < 1e-6, "price {}", p.price);
			assert!(STYLES.contains(&p.category.as_str()));
			assert_eq!(p.name.split(' ').count(), 2);
		}
	}
}
