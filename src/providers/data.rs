//! Embedded data tables for value generation.
//!
//! Deliberately compact: enough variety for test fixtures to look real
//! without shipping a dictionary. Product names line up with the category
//! affinity groups used by the coherence scorer, so synthetic carts score
//! the way curated ones do.

/// Common first names.
pub const FIRST_NAMES: &[&str] = &[
    "James", "Mary", "Robert", "Patricia", "John", "Jennifer", "Michael", "Linda", "David",
    "Elizabeth", "William", "Barbara", "Richard", "Susan", "Joseph", "Jessica", "Thomas", "Sarah",
    "Charles", "Karen", "Christopher", "Lisa", "Daniel", "Nancy", "Matthew", "Betty", "Anthony",
    "Sandra", "Mark", "Margaret", "Aisha", "Wei", "Carlos", "Priya", "Yuki", "Omar", "Ingrid",
    "Mateo", "Zara", "Kofi",
];

/// Common last names.
pub const LAST_NAMES: &[&str] = &[
    "Smith", "Johnson", "Williams", "Brown", "Jones", "Garcia", "Miller", "Davis", "Rodriguez",
    "Martinez", "Hernandez", "Lopez", "Gonzalez", "Wilson", "Anderson", "Thomas", "Taylor",
    "Moore", "Jackson", "Martin", "Lee", "Perez", "Thompson", "White", "Harris", "Sanchez",
    "Clark", "Ramirez", "Lewis", "Robinson", "Nguyen", "Kim", "Patel", "Chen", "Okafor",
];

/// Street name stems.
pub const STREET_NAMES: &[&str] = &[
    "Maple", "Oak", "Cedar", "Pine", "Elm", "Washington", "Lake", "Hill", "Park", "Main",
    "Franklin", "Highland", "Sunset", "Ridge", "Meadow", "River", "Chestnut", "Spring",
];

/// Street type suffixes.
pub const STREET_SUFFIXES: &[&str] = &["St", "Ave", "Blvd", "Dr", "Ln", "Rd", "Ct", "Way"];

/// US cities.
pub const CITIES: &[&str] = &[
    "New York", "Los Angeles", "Chicago", "Houston", "Phoenix", "Philadelphia", "San Antonio",
    "San Diego", "Dallas", "Austin", "Columbus", "Charlotte", "Seattle", "Denver", "Boston",
    "Portland", "Atlanta", "Miami", "Minneapolis", "Cleveland",
];

/// US state abbreviations.
pub const STATES: &[&str] = &[
    "AL", "AZ", "CA", "CO", "CT", "FL", "GA", "IL", "IN", "MA", "MD", "MI", "MN", "MO", "NC",
    "NJ", "NY", "OH", "OR", "PA", "TN", "TX", "VA", "WA", "WI",
];

/// Countries for non-US fallbacks.
pub const COUNTRIES: &[&str] = &["US", "CA", "GB", "DE", "FR", "AU", "JP"];

/// Free email domains.
pub const EMAIL_DOMAINS: &[&str] = &[
    "gmail.com",
    "yahoo.com",
    "outlook.com",
    "icloud.com",
    "hotmail.com",
    "proton.me",
];

/// SKU category prefixes.
pub const SKU_CATEGORIES: &[&str] = &["APP", "HOME", "BEAUTY", "JEWELRY", "SHOES", "KIDS"];

/// Product categories matching the catalog schema.
pub const PRODUCT_CATEGORIES: &[&str] = &["Electronics", "Clothing", "Home", "Beauty", "Sports"];

/// Brand names.
pub const BRANDS: &[&str] = &[
    "Northwind", "Alpine Co", "Lumen", "Hearthstone", "Vela", "Crestline", "Marlowe",
    "True North", "Saffron", "Atlas Goods",
];

/// Product names grouped by shopping occasion. Kept in sync with the
/// coherence scorer's affinity groups.
pub const PRODUCT_GROUPS: &[(&str, &[&str])] = &[
    (
        "fitness",
        &[
            "Running Shoes",
            "Athletic Socks",
            "Water Bottle",
            "Fitness Tracker",
            "Gym Bag",
            "Yoga Mat",
        ],
    ),
    (
        "beauty",
        &[
            "Lipstick",
            "Mascara",
            "Foundation",
            "Makeup Brushes",
            "Makeup Remover",
            "Face Cream",
        ],
    ),
    (
        "home",
        &[
            "Bedding Set",
            "Pillows",
            "Throw Blankets",
            "Candles",
            "Throw Pillows",
            "Sheets",
        ],
    ),
    (
        "baby",
        &[
            "Onesies",
            "Baby Blanket",
            "Stuffed Animal",
            "Baby Clothes",
            "Diapers",
            "Bottles",
        ],
    ),
    (
        "date_night",
        &["Dress", "Heels", "Clutch", "Jewelry Set", "Perfume", "Earrings"],
    ),
    (
        "office",
        &[
            "Blazer",
            "Dress Shirt",
            "Slacks",
            "Tie",
            "Belt",
            "Dress Shoes",
        ],
    ),
    (
        "casual",
        &["Jeans", "T-Shirt", "Sneakers", "Hoodie", "Backpack", "Cap"],
    ),
    (
        "kitchen",
        &[
            "Cookware Set",
            "Utensils",
            "Dishes",
            "Glassware",
            "Cutting Board",
            "Knives",
        ],
    ),
];

/// Words for generated sentences and review bodies.
pub const WORDS: &[&str] = &[
    "quality", "fits", "great", "ordered", "arrived", "perfect", "color", "size", "fabric",
    "comfortable", "shipping", "fast", "price", "value", "recommend", "bought", "gift",
    "exactly", "described", "happy", "soft", "sturdy", "stylish", "returned", "smaller",
    "larger", "expected", "love", "daily", "works", "well", "packaging", "solid", "lightweight",
    "durable", "looks", "feels", "worth", "every", "penny",
];
