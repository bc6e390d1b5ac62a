use bson::oid::ObjectId;
use mogul::model::CollectionName;
use mogul_derive::{Embedded, Model};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, Embedded)]
#[serde(default)]
pub struct Coordinates {
    #[field(filter = "lat")]
    pub lat: f64,
    #[field(filter = "lng")]
    pub lng: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, Embedded)]
#[serde(default)]
pub struct Location {
    #[field(filter = "city")]
    pub city: String,
    #[field(filter = "zip", omitempty)]
    pub zip: String,
    #[field(filter = "coordinates")]
    pub coordinates: Coordinates,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, Model)]
#[model(collection = "people", index(fields = "email", unique, name = "email_unique"))]
pub struct Person {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    #[field(omitempty)]
    pub id: Option<ObjectId>,
    #[field(filter = "first_name")]
    pub first_name: String,
    #[field(filter = "last_name")]
    pub last_name: String,
    #[field(filter = "email", omitempty)]
    pub email: String,
    #[field(filter = "age", omitempty)]
    pub age: i32,
    #[field(filter = "tags")]
    pub tags: Vec<String>,
    #[field(filter = "location")]
    pub location: Location,
    #[field(filter = "-")]
    pub nickname: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[field(omitempty)]
    pub deleted_at: Option<bson::DateTime>,
}

impl Person {
    pub fn new(first_name: &str, last_name: &str, age: i32, city: &str) -> Self {
        Person {
            first_name: first_name.to_string(),
            last_name: last_name.to_string(),
            email: format!("{}.{}@example.com", first_name, last_name).to_lowercase(),
            age,
            location: Location {
                city: city.to_string(),
                ..Default::default()
            },
            ..Default::default()
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, Model)]
pub struct UserAccount {
    #[field(filter = "login")]
    pub login: String,
    #[field(name = "active_flag", filter = "active_flag")]
    #[serde(rename = "active_flag")]
    pub active: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, Model)]
#[model(custom_name)]
pub struct TenantOrder {
    #[field(filter = "tenant")]
    pub tenant: String,
    #[field(filter = "total")]
    pub total: i64,
}

impl CollectionName for TenantOrder {
    fn collection_name(&self) -> String {
        if self.tenant.is_empty() {
            "orders".to_string()
        } else {
            format!("orders_{}", self.tenant)
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, Model)]
#[model(index(fields = "sku", unique), index(fields = "warehouse,-qty"))]
pub struct StockItem {
    #[field(filter = "sku")]
    pub sku: String,
    #[field(filter = "warehouse")]
    pub warehouse: String,
    #[field(filter = "qty")]
    pub qty: i64,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub enum Tier {
    #[default]
    Basic,
    Gold,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, Model)]
#[serde(rename_all = "camelCase")]
pub struct Account {
    #[field(filter = "firstName", omitempty)]
    pub first_name: String,
    #[field(filter = "loginCount", omitempty)]
    pub login_count: i64,
    #[field(serde, filter = "tier", omitempty)]
    pub tier: Option<Tier>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, Model)]
pub struct Counter {
    #[field(filter = "hits")]
    pub hits: u64,
}

pub fn sample_people() -> Vec<Person> {
    vec![
        Person::new("Ann", "Lee", 31, "NYC"),
        Person::new("Bob", "Stone", 25, "Boston"),
        Person::new("Cyd", "Lee", 47, "NYC"),
        Person::new("Dee", "Park", 19, "Austin"),
    ]
}
