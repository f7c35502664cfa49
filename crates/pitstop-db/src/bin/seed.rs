//! # Seed Data Generator
//!
//! Populates the database with sample fleet data for development.
//!
//! ## Usage
//! ```bash
//! # Generate 50 cars (default)
//! cargo run -p pitstop-db --bin seed
//!
//! # Generate custom amount
//! cargo run -p pitstop-db --bin seed -- --count 200
//!
//! # Specify database path
//! cargo run -p pitstop-db --bin seed -- --db ./data/pitstop.db
//! ```
//!
//! ## Generated Data
//! - Garages: a city × street grid with varied daily capacities
//! - Cars: make × model combinations with plates and production years
//! - Assignments: each car joined to 1-3 garages
//! - Bookings: spread over a month from a fixed base date, including one
//!   deliberately over-booked day so availability reports show a negative
//!   number out of the box
//!
//! All values are derived arithmetically from the row index, so repeated
//! runs against fresh databases produce identical data (apart from the
//! generated UUIDs).

use std::env;

use chrono::{Duration, NaiveDate, Utc};

use pitstop_core::calendar::DayBucket;
use pitstop_core::report::daily_availability_report;
use pitstop_core::{Car, Garage, MaintenanceRequest};
use pitstop_db::repository::car::generate_car_id;
use pitstop_db::repository::garage::generate_garage_id;
use pitstop_db::repository::maintenance::generate_maintenance_id;
use pitstop_db::{Database, DbConfig};

/// Garage cities with their license plate region codes.
const CITIES: &[(&str, &str)] = &[
    ("Sofia", "CA"),
    ("Plovdiv", "PB"),
    ("Varna", "B"),
    ("Burgas", "A"),
    ("Ruse", "P"),
];

/// Street addresses reused across cities.
const STREETS: &[&str] = &[
    "1 Vitosha Blvd",
    "24 Maria Louisa Blvd",
    "7 Dondukov Blvd",
    "112 Tsarigradsko Shose",
];

/// Daily capacities cycled across the garage grid.
const CAPACITIES: &[i64] = &[2, 3, 5, 8, 12, 20];

/// Car makes with their models.
const MAKES: &[(&str, &[&str])] = &[
    ("Hyundai", &["Accent", "i30", "Tucson", "Elantra", "Kona"]),
    ("Toyota", &["Corolla", "Yaris", "RAV4", "Camry", "Auris"]),
    ("Volkswagen", &["Golf", "Passat", "Polo", "Tiguan", "Touran"]),
    ("Ford", &["Focus", "Fiesta", "Mondeo", "Kuga", "Puma"]),
    ("Renault", &["Clio", "Megane", "Captur", "Scenic", "Talisman"]),
    ("Skoda", &["Octavia", "Fabia", "Superb", "Kodiaq", "Kamiq"]),
    ("Peugeot", &["208", "308", "3008", "508", "2008"]),
    ("Opel", &["Astra", "Corsa", "Insignia", "Mokka", "Grandland"]),
    ("BMW", &["320d", "118i", "X1", "X3", "520d"]),
    ("Mercedes", &["C200", "A180", "E220", "GLA200", "B180"]),
];

/// License plate letter suffixes.
const PLATE_SUFFIXES: &[&str] = &["AX", "BH", "CK", "EP", "HM", "KT", "MA", "PX", "TC", "XB"];

/// Booking service types.
const SERVICE_TYPES: &[&str] = &[
    "Oil change",
    "Tire rotation",
    "Brake inspection",
    "Battery replacement",
    "Wheel alignment",
    "Air filter change",
    "Coolant flush",
    "Spark plug replacement",
];

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Parse command line arguments
    let args: Vec<String> = env::args().collect();

    let mut count: usize = 50;
    let mut db_path = String::from("./pitstop_dev.db");

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--count" | "-c" => {
                if i + 1 < args.len() {
                    count = args[i + 1].parse().unwrap_or(50);
                    i += 1;
                }
            }
            "--db" | "-d" => {
                if i + 1 < args.len() {
                    db_path = args[i + 1].clone();
                    i += 1;
                }
            }
            "--help" | "-h" => {
                println!("Pitstop Seed Data Generator");
                println!();
                println!("Usage: seed [OPTIONS]");
                println!();
                println!("Options:");
                println!("  -c, --count <N>    Number of cars to generate (default: 50)");
                println!("  -d, --db <PATH>    Database file path (default: ./pitstop_dev.db)");
                println!("  -h, --help         Show this help message");
                return Ok(());
            }
            _ => {}
        }
        i += 1;
    }

    println!("🌱 Pitstop Seed Data Generator");
    println!("==============================");
    println!("Database: {}", db_path);
    println!("Cars:     {}", count);
    println!();

    // Connect to database
    let config = DbConfig::new(&db_path);
    let db = Database::new(config).await?;

    println!("✓ Connected to database");
    println!("✓ Migrations applied");

    // Check existing data
    let existing = db.cars().count().await?;
    if existing > 0 {
        println!("⚠ Database already has {} cars", existing);
        println!("  Skipping seed to avoid duplicates.");
        println!("  Delete the database file to regenerate.");
        return Ok(());
    }

    let base_day =
        NaiveDate::from_ymd_opt(2026, 9, 1).ok_or("invalid base date for seed bookings")?;
    let start = std::time::Instant::now();

    // Garages: city x street grid
    println!();
    println!("Generating garages...");

    let mut garages = Vec::new();
    for (city_idx, (city, _)) in CITIES.iter().enumerate() {
        for (street_idx, street) in STREETS.iter().enumerate() {
            let seed = city_idx * STREETS.len() + street_idx;
            let garage = Garage {
                id: generate_garage_id(),
                name: format!("{} Auto Center {}", city, street_idx + 1),
                location: street.to_string(),
                city: city.to_string(),
                capacity: CAPACITIES[(seed * 7) % CAPACITIES.len()],
                created_at: Utc::now(),
                updated_at: Utc::now(),
            };
            db.garages().insert(&garage).await?;
            garages.push(garage);
        }
    }
    println!("✓ Generated {} garages", garages.len());

    // Cars: make x model combinations
    println!("Generating cars...");

    let mut cars = Vec::new();
    for seed in 0..count {
        let (make, models) = MAKES[seed % MAKES.len()];
        let model = models[(seed / MAKES.len()) % models.len()];
        let (_, region) = CITIES[seed % CITIES.len()];

        let car = Car {
            id: generate_car_id(),
            make: make.to_string(),
            model: model.to_string(),
            production_year: 1998 + ((seed * 13) % 27) as i64,
            license_plate: format!(
                "{}-{:04}-{}",
                region,
                1000 + (seed * 37) % 9000,
                PLATE_SUFFIXES[seed % PLATE_SUFFIXES.len()]
            ),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };
        db.cars().insert(&car).await?;
        cars.push(car);
    }
    println!("✓ Generated {} cars", cars.len());

    // Assignments: each car joined to 1-3 garages
    println!("Generating assignments...");

    let mut assignment_count = 0;
    for (seed, car) in cars.iter().enumerate() {
        let garage_ids: Vec<String> = (0..=(seed % 3))
            .map(|j| garages[(seed * 3 + j * 7) % garages.len()].id.clone())
            .collect();
        db.assignments().set_car_garages(&car.id, &garage_ids).await?;
        assignment_count += db.assignments().garages_for_car(&car.id).await?.len();
    }
    println!("✓ Generated {} assignments", assignment_count);

    // Bookings: spread over the month after the base date
    println!("Generating bookings...");

    let mut booking_count = 0;
    for (seed, car) in cars.iter().enumerate() {
        let assigned = db.assignments().garages_for_car(&car.id).await?;
        if assigned.is_empty() {
            continue;
        }

        for j in 0..(seed % 4) {
            let day = base_day + Duration::days(((seed * 5 + j * 11) % 30) as i64);
            let request = MaintenanceRequest {
                id: generate_maintenance_id(),
                car_id: car.id.clone(),
                garage_id: assigned[j % assigned.len()].clone(),
                service_type: SERVICE_TYPES[(seed + j) % SERVICE_TYPES.len()].to_string(),
                scheduled_date: DayBucket::for_date(day).start,
                created_at: Utc::now(),
                updated_at: Utc::now(),
            };
            db.maintenance().insert(&request).await?;
            booking_count += 1;
        }
    }
    println!("✓ Generated {} bookings", booking_count);

    // Over-book one day at the first garage: capacity + 2 extra rows, written
    // straight past the admission gate, so reports show negative availability
    let crowded = &garages[0];
    let crowded_day = base_day + Duration::days(3);
    let existing_on_day = {
        let bucket = DayBucket::for_date(crowded_day);
        db.maintenance()
            .for_garage_between(&crowded.id, bucket.start, bucket.end)
            .await?
            .len() as i64
    };
    let to_insert = crowded.capacity + 2 - existing_on_day;
    for k in 0..to_insert.max(0) {
        let car = &cars[(k as usize * 11) % cars.len()];
        let request = MaintenanceRequest {
            id: generate_maintenance_id(),
            car_id: car.id.clone(),
            garage_id: crowded.id.clone(),
            service_type: SERVICE_TYPES[k as usize % SERVICE_TYPES.len()].to_string(),
            scheduled_date: DayBucket::for_date(crowded_day).start,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };
        db.maintenance().insert(&request).await?;
        booking_count += 1;
    }
    println!(
        "✓ Over-booked {} on {} (capacity {})",
        crowded.name, crowded_day, crowded.capacity
    );

    let elapsed = start.elapsed();
    println!();
    println!("✓ Seeded in {:?}", elapsed);

    // Verify the over-booked day shows up as negative availability
    println!();
    println!("Verifying availability report...");
    let bucket = DayBucket::for_date(crowded_day);
    let booked = db
        .maintenance()
        .for_garage_between(&crowded.id, bucket.start, bucket.end)
        .await?;
    let report = daily_availability_report(crowded, bucket.start, bucket.end, &booked);
    for day in &report {
        println!(
            "  {}: {} requests, availableCapacity {}",
            day.date, day.requests, day.available_capacity
        );
    }

    println!();
    println!("✓ Seed complete!");

    Ok(())
}
