//! Database seeder for Stockbar development and testing.
//!
//! Seeds an admin user, a demo category, demo products, and a walk-in
//! client for local development. Safe to run repeatedly: each seed checks
//! for an existing row first.
//!
//! Usage: cargo run --bin seeder

use chrono::Utc;
use rust_decimal_macros::dec;
use sea_orm::{ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, Set};
use uuid::Uuid;

use stockbar_core::auth::hash_password;
use stockbar_db::entities::{categories, clients, products, roles, suppliers, users};

/// Admin user ID (consistent for all seeds)
const ADMIN_USER_ID: &str = "00000000-0000-0000-0000-000000000002";
/// Demo category ID (consistent for all seeds)
const DEMO_CATEGORY_ID: &str = "00000000-0000-0000-0000-000000000010";
/// Walk-in client ID (consistent for all seeds)
const WALK_IN_CLIENT_ID: &str = "00000000-0000-0000-0000-000000000020";
/// Demo supplier ID (consistent for all seeds)
const DEMO_SUPPLIER_ID: &str = "00000000-0000-0000-0000-000000000030";

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    let database_url =
        std::env::var("DATABASE_URL").expect("DATABASE_URL must be set in environment");

    println!("Connecting to database...");
    let db = stockbar_db::connect(&database_url)
        .await
        .expect("Failed to connect to database");

    println!("Seeding admin user...");
    seed_admin_user(&db).await;

    println!("Seeding demo category...");
    seed_demo_category(&db).await;

    println!("Seeding demo products...");
    seed_demo_products(&db).await;

    println!("Seeding walk-in client...");
    seed_walk_in_client(&db).await;

    println!("Seeding demo supplier...");
    seed_demo_supplier(&db).await;

    println!("Seeding complete!");
}

fn admin_user_id() -> Uuid {
    Uuid::parse_str(ADMIN_USER_ID).unwrap()
}

fn demo_category_id() -> Uuid {
    Uuid::parse_str(DEMO_CATEGORY_ID).unwrap()
}

/// Seeds the admin user. The `admin` role is created by the initial
/// migration.
async fn seed_admin_user(db: &DatabaseConnection) {
    if users::Entity::find_by_id(admin_user_id())
        .one(db)
        .await
        .ok()
        .flatten()
        .is_some()
    {
        println!("  Admin user already exists, skipping...");
        return;
    }

    let admin_role = roles::Entity::find()
        .filter(roles::Column::Name.eq("admin"))
        .one(db)
        .await
        .expect("Failed to query roles")
        .expect("admin role missing - run migrations first");

    let password = std::env::var("SEED_ADMIN_PASSWORD").unwrap_or_else(|_| "admin123".to_string());
    let password_hash = hash_password(&password).expect("Failed to hash password");

    let now = Utc::now().into();
    let user = users::ActiveModel {
        id: Set(admin_user_id()),
        email: Set("admin@stockbar.dev".to_string()),
        password_hash: Set(password_hash),
        full_name: Set("Administrator".to_string()),
        username: Set(Some("admin".to_string())),
        role_id: Set(admin_role.id),
        is_active: Set(true),
        created_at: Set(now),
        updated_at: Set(now),
    };

    user.insert(db).await.expect("Failed to seed admin user");
}

async fn seed_demo_category(db: &DatabaseConnection) {
    if categories::Entity::find_by_id(demo_category_id())
        .one(db)
        .await
        .ok()
        .flatten()
        .is_some()
    {
        println!("  Demo category already exists, skipping...");
        return;
    }

    let category = categories::ActiveModel {
        id: Set(demo_category_id()),
        name: Set("Beverages".to_string()),
        description: Set(Some("Bottled and draft drinks".to_string())),
        is_active: Set(true),
        created_at: Set(Utc::now().into()),
    };

    category
        .insert(db)
        .await
        .expect("Failed to seed demo category");
}

async fn seed_demo_products(db: &DatabaseConnection) {
    let demo = [
        ("Lager 330ml", dec!(0.80), dec!(2.50), 48),
        ("Stout 440ml", dec!(1.10), dec!(3.20), 24),
        ("Sparkling water 500ml", dec!(0.30), dec!(1.20), 60),
    ];

    for (name, purchase_price, sale_price, stock) in demo {
        let exists = products::Entity::find()
            .filter(products::Column::Name.eq(name))
            .one(db)
            .await
            .ok()
            .flatten()
            .is_some();
        if exists {
            println!("  Product '{name}' already exists, skipping...");
            continue;
        }

        let now = Utc::now().into();
        let product = products::ActiveModel {
            id: Set(Uuid::new_v4()),
            name: Set(name.to_string()),
            category_id: Set(Some(demo_category_id())),
            stock: Set(stock),
            purchase_price: Set(purchase_price),
            sale_price: Set(sale_price),
            is_active: Set(true),
            created_at: Set(now),
            updated_at: Set(now),
        };

        product.insert(db).await.expect("Failed to seed product");
    }
}

async fn seed_walk_in_client(db: &DatabaseConnection) {
    let id = Uuid::parse_str(WALK_IN_CLIENT_ID).unwrap();
    if clients::Entity::find_by_id(id)
        .one(db)
        .await
        .ok()
        .flatten()
        .is_some()
    {
        println!("  Walk-in client already exists, skipping...");
        return;
    }

    let client = clients::ActiveModel {
        id: Set(id),
        name: Set("Walk-in customer".to_string()),
        document_type: Set(None),
        document_number: Set(None),
        phone: Set(None),
        address: Set(None),
        is_active: Set(true),
        created_at: Set(Utc::now().into()),
    };

    client.insert(db).await.expect("Failed to seed client");
}

async fn seed_demo_supplier(db: &DatabaseConnection) {
    let id = Uuid::parse_str(DEMO_SUPPLIER_ID).unwrap();
    if suppliers::Entity::find_by_id(id)
        .one(db)
        .await
        .ok()
        .flatten()
        .is_some()
    {
        println!("  Demo supplier already exists, skipping...");
        return;
    }

    let supplier = suppliers::ActiveModel {
        id: Set(id),
        name: Set("City Beverages Ltd".to_string()),
        document_type: Set(None),
        document_number: Set(None),
        contact_name: Set(Some("Sales desk".to_string())),
        phone: Set(None),
        email: Set(Some("orders@citybeverages.example".to_string())),
        address: Set(None),
        is_active: Set(true),
        created_at: Set(Utc::now().into()),
    };

    supplier.insert(db).await.expect("Failed to seed supplier");
}
