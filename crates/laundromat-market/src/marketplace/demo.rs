//! Demo data used when the marketplace API has nothing to show.

use serde_json::{json, Value};

/// Supplies placeholder records when a load returns no listings.
pub trait EmptyStateProvider: Send + Sync {
    fn records(&self) -> Vec<Value>;
}

/// Fixed set of sample laundromats covering every status and business type.
#[derive(Debug, Clone, Copy, Default)]
pub struct DemoListings;

impl EmptyStateProvider for DemoListings {
    fn records(&self) -> Vec<Value> {
        vec![
            json!({
                "id": "demo-tampa-westshore",
                "location": "Westshore, Tampa, FL",
                "description": "Card-operated store in a grocery-anchored plaza with wash-dry-fold revenue.",
                "broker": {"name": "Rosa Diaz", "company": "Gulf Coast Business Brokers"},
                "askingPrice": 485000,
                "monthlyProfit": 9800,
                "status": "active",
                "type": "card-operated",
                "verified": true,
                "featured": true,
                "squareFeet": 3200,
                "washerCount": 42,
                "dryerCount": 38,
                "daysOnMarket": 12,
                "grade": "A",
                "createdAt": "2025-05-02T15:00:00Z",
                "highlights": ["Lease through 2034", "New Electrolux washers"]
            }),
            json!({
                "id": "demo-austin-riverside",
                "location": "Riverside, Austin, TX",
                "description": "Coin laundry near student housing, owner semi-absentee.",
                "broker": {"name": "Marcus Lee", "company": "Lone Star Laundry Sales"},
                "askingPrice": 265000,
                "monthlyProfit": 5100,
                "status": "pending",
                "type": "coin-operated",
                "verified": true,
                "featured": false,
                "squareFeet": 2100,
                "washerCount": 28,
                "dryerCount": 24,
                "daysOnMarket": 45,
                "grade": "B+",
                "createdAt": "2025-03-18T10:30:00Z"
            }),
            json!({
                "id": "demo-phoenix-camelback",
                "location": "Camelback East, Phoenix, AZ",
                "description": "Hybrid coin and app payments, 24-hour attended store.",
                "broker": {"name": "Priya Shah", "company": "Desert Business Advisors"},
                "askingPrice": 720000,
                "netIncome": 151000,
                "status": "new",
                "type": "hybrid",
                "verified": false,
                "featured": true,
                "squareFeet": 4500,
                "washerCount": 55,
                "dryerCount": 50,
                "daysOnMarket": 3,
                "grade": "A-",
                "createdAt": "2025-06-10T09:00:00Z"
            }),
            json!({
                "id": "demo-columbus-clintonville",
                "location": "Clintonville, Columbus, OH",
                "description": "Long-running neighborhood laundromat with dry cleaning drop-off.",
                "broker": {"name": "Ethan Brooks"},
                "askingPrice": 189000,
                "monthlyProfit": 3300,
                "status": "under_contract",
                "type": "coin-operated",
                "verified": true,
                "featured": false,
                "squareFeet": 1800,
                "washerCount": 22,
                "dryerCount": 20,
                "daysOnMarket": 88,
                "grade": "B-",
                "createdAt": "2024-12-01T12:00:00Z"
            }),
            json!({
                "id": "demo-charlotte-southend",
                "location": "South End, Charlotte, NC",
                "description": "Card system with pickup and delivery route, recently remodeled.",
                "broker": {"name": "Naomi Grant", "company": "Carolina Main Street Brokers"},
                "askingPrice": 540000,
                "monthlyProfit": 8700,
                "status": "sold",
                "type": "card-operated",
                "verified": true,
                "featured": false,
                "squareFeet": 3600,
                "washerCount": 40,
                "dryerCount": 36,
                "daysOnMarket": 61,
                "grade": "A+",
                "createdAt": "2025-01-22T08:00:00Z"
            }),
            json!({
                "id": "demo-fresno-tower",
                "location": "Tower District, Fresno, CA",
                "description": "Value-add opportunity: aging equipment, strong foot traffic.",
                "askingPrice": 145000,
                "monthlyProfit": 2100,
                "status": "active",
                "type": "coin-operated",
                "verified": false,
                "featured": false,
                "squareFeet": 1500,
                "washerCount": 18,
                "dryerCount": 16,
                "daysOnMarket": 20,
                "grade": "C+",
                "createdAt": "2025-04-07T17:45:00Z"
            }),
        ]
    }
}
