// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use gastos_app::{Expense, ExpenseId};
use time::{Date, Month};

const EXPENSE_CATEGORIES: [&str; 8] = [
    "Dining",
    "Entertainment",
    "Groceries",
    "Health",
    "Rent",
    "Shopping",
    "Transport",
    "Utilities",
];

const REFERENCE_YEAR: i32 = 2026;

#[derive(Debug, Clone)]
struct DeterministicRng {
    state: u64,
}

impl DeterministicRng {
    fn new(seed: u64) -> Self {
        let mut state = seed ^ 0x9E37_79B9_7F4A_7C15;
        if state == 0 {
            state = 0xA409_3822_299F_31D0;
        }
        Self { state }
    }

    fn next_u64(&mut self) -> u64 {
        self.state = self
            .state
            .wrapping_mul(6_364_136_223_846_793_005)
            .wrapping_add(1_442_695_040_888_963_407);

        let mut x = self.state;
        x ^= x >> 13;
        x ^= x << 7;
        x ^= x >> 17;
        x
    }

    fn int_n(&mut self, n: usize) -> usize {
        if n <= 1 {
            return 0;
        }
        (self.next_u64() % (n as u64)) as usize
    }

    fn bool(&mut self) -> bool {
        (self.next_u64() & 1) == 1
    }
}

#[derive(Debug, Clone)]
pub struct ExpenseFaker {
    rng: DeterministicRng,
    next_id: u64,
}

impl ExpenseFaker {
    pub fn new(seed: u64) -> Self {
        let normalized = if seed == 0 { 1 } else { seed };
        Self {
            rng: DeterministicRng::new(normalized),
            next_id: 0,
        }
    }

    pub fn int_n(&mut self, n: usize) -> usize {
        self.rng.int_n(n)
    }

    pub fn expense(&mut self) -> Expense {
        let category = self.pick(&EXPENSE_CATEGORIES);
        self.expense_in_category(category)
    }

    pub fn expense_in_category(&mut self, category: &str) -> Expense {
        let merchants = merchant_pool(category);
        let title = if merchants.is_empty() {
            format!("{category} purchase")
        } else {
            self.pick(merchants).to_owned()
        };

        let (min_cents, max_cents) = amount_range(category);
        let mut amount_cents = self.int_range_i64(min_cents, max_cents);
        // Card statements are full of whole-dollar charges.
        if self.rng.bool() {
            amount_cents -= amount_cents % 100;
        }

        self.next_id += 1;
        Expense {
            id: ExpenseId::new(format!("exp-{:06}", self.next_id)),
            title,
            amount_cents,
            category: category.to_owned(),
            date: self.date_in_year(REFERENCE_YEAR),
        }
    }

    pub fn expenses(&mut self, count: usize) -> Vec<Expense> {
        (0..count).map(|_| self.expense()).collect()
    }

    pub fn date_in_year(&mut self, year: i32) -> Date {
        let start = calendar_date(year, Month::January, 1);
        let end = calendar_date(year, Month::December, 31);
        self.random_date_between(start, end)
    }

    fn pick<'a>(&mut self, items: &'a [&'a str]) -> &'a str {
        items[self.rng.int_n(items.len())]
    }

    fn int_range_i64(&mut self, min: i64, max: i64) -> i64 {
        if max <= min {
            return min;
        }
        let span = max - min + 1;
        min + (self.rng.next_u64() % (span as u64)) as i64
    }

    fn random_date_between(&mut self, start: Date, end: Date) -> Date {
        let start_day = start.to_julian_day();
        let end_day = end.to_julian_day();
        if end_day <= start_day {
            return start;
        }
        let span = (end_day - start_day) as u64;
        let offset = (self.rng.next_u64() % (span + 1)) as i32;
        Date::from_julian_day(start_day + offset).expect("valid julian day")
    }
}

pub fn expense_categories() -> &'static [&'static str] {
    &EXPENSE_CATEGORIES
}

pub fn fixture_date() -> Date {
    calendar_date(REFERENCE_YEAR, Month::February, 19)
}

fn calendar_date(year: i32, month: Month, day: u8) -> Date {
    Date::from_calendar_date(year, month, day).expect("valid calendar date")
}

fn merchant_pool(category: &str) -> &'static [&'static str] {
    match category {
        "Dining" => &[
            "Blue Finch Cafe",
            "Taco Garden",
            "Noodle House",
            "Corner Bistro",
            "Sunrise Diner",
            "Pizza Union",
        ],
        "Entertainment" => &[
            "City Cinema",
            "Vinyl Vault",
            "Arcade Alley",
            "Concert Hall Box Office",
            "Mini Golf Park",
        ],
        "Groceries" => &[
            "Greenfield Market",
            "Daily Harvest Grocery",
            "Corner Pantry",
            "Farmers Collective",
            "Value Foods",
            "Hillside Co-op",
        ],
        "Health" => &[
            "Lakeside Pharmacy",
            "City Dental",
            "Wellness Clinic",
            "Optic Care",
            "Peak Physical Therapy",
            "Harbor Urgent Care",
        ],
        "Rent" => &[
            "Maple Court Apartments",
            "Northview Property Management",
            "Hillcrest Leasing",
            "Parkside Realty",
        ],
        "Shopping" => &[
            "Thread & Needle",
            "Home Basics",
            "Gadget Depot",
            "Paper Lantern Gifts",
            "Shoe Loft",
            "Book Nook",
        ],
        "Transport" => &[
            "Metro Transit",
            "Shell Station",
            "City Cab",
            "Airport Parking",
            "Bike Works",
        ],
        "Utilities" => &[
            "City Power & Light",
            "Clearwater Utility",
            "Metro Gas",
            "Fiber One Internet",
            "Waveline Mobile",
        ],
        _ => &[],
    }
}

fn amount_range(category: &str) -> (i64, i64) {
    match category {
        "Dining" => (500, 9_500),
        "Entertainment" => (800, 15_000),
        "Groceries" => (1_500, 22_000),
        "Health" => (1_000, 45_000),
        "Rent" => (95_000, 240_000),
        "Shopping" => (900, 30_000),
        "Transport" => (250, 8_000),
        "Utilities" => (3_000, 18_000),
        _ => (500, 20_000),
    }
}
