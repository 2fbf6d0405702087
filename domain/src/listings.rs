//! Donations, food requests and the dashboard cards that present them.
//!
//! Data is in-memory for the page lifetime. "Available food" is a plain copy
//! of the donation list, not a managed view.

use chrono::{DateTime, NaiveDate, Utc};
use shared::{Donation, FoodRequest, ListingStatus, UserRole, Urgency};

use crate::validation::FormValues;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ListingBoard {
    donations: Vec<Donation>,
    requests: Vec<FoodRequest>,
}

impl ListingBoard {
    /// Board pre-filled with the demo listings
    pub fn sample() -> Self {
        Self {
            donations: vec![
                Donation {
                    id: 1,
                    food_type: "Fruits & Vegetables".to_string(),
                    quantity: "5 kg".to_string(),
                    expiry_date: "2024-02-15".to_string(),
                    pickup_location: "Central Market, Downtown".to_string(),
                    description: "Fresh organic fruits and vegetables".to_string(),
                    contact_phone: "+1-555-0123".to_string(),
                    status: ListingStatus::Pending,
                    date_submitted: "2024-01-20T10:00:00Z".to_string(),
                    donor: "John Smith".to_string(),
                },
                Donation {
                    id: 2,
                    food_type: "Grains & Bread".to_string(),
                    quantity: "10 loaves".to_string(),
                    expiry_date: "2024-01-25".to_string(),
                    pickup_location: "Bakery Corner, West Side".to_string(),
                    description: "Fresh bread and pastries".to_string(),
                    contact_phone: "+1-555-0124".to_string(),
                    status: ListingStatus::Approved,
                    date_submitted: "2024-01-19T14:30:00Z".to_string(),
                    donor: "Sarah Johnson".to_string(),
                },
            ],
            requests: vec![
                FoodRequest {
                    id: 1,
                    org_name: "Hope Shelter".to_string(),
                    org_type: "Homeless Shelter".to_string(),
                    people_count: 50,
                    food_needs: "Hot meals, fruits, and bread".to_string(),
                    delivery_address: "123 Hope Street, Downtown".to_string(),
                    urgency: Urgency::High,
                    org_contact: "Mike Wilson - +1-555-0200".to_string(),
                    status: ListingStatus::Pending,
                    date_submitted: "2024-01-20T09:00:00Z".to_string(),
                    organization: "Hope Shelter".to_string(),
                },
                FoodRequest {
                    id: 2,
                    org_name: "Community Food Bank".to_string(),
                    org_type: "Food Bank".to_string(),
                    people_count: 200,
                    food_needs: "Non-perishable items, canned goods".to_string(),
                    delivery_address: "456 Community Ave, East Side".to_string(),
                    urgency: Urgency::Medium,
                    org_contact: "Lisa Brown - +1-555-0201".to_string(),
                    status: ListingStatus::Approved,
                    date_submitted: "2024-01-18T16:00:00Z".to_string(),
                    organization: "Community Food Bank".to_string(),
                },
            ],
        }
    }

    pub fn donations(&self) -> &[Donation] {
        &self.donations
    }

    pub fn requests(&self) -> &[FoodRequest] {
        &self.requests
    }

    pub fn available_food(&self) -> Vec<Donation> {
        self.donations.clone()
    }

    pub fn add_donation(&mut self, donation: Donation) {
        self.donations.push(donation);
    }

    pub fn add_request(&mut self, request: FoodRequest) {
        self.requests.push(request);
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DashboardTab {
    Donations,
    Requests,
    Available,
}

impl DashboardTab {
    pub const ALL: [DashboardTab; 3] = [DashboardTab::Donations, DashboardTab::Requests, DashboardTab::Available];

    pub fn label(&self) -> &'static str {
        match self {
            DashboardTab::Donations => "My Donations",
            DashboardTab::Requests => "My Requests",
            DashboardTab::Available => "Available Food",
        }
    }

    pub fn empty_message(&self) -> &'static str {
        match self {
            DashboardTab::Donations => "No donations yet. Start by making your first donation!",
            DashboardTab::Requests => "No requests yet. Start by making your first request!",
            DashboardTab::Available => "No food available at the moment. Check back later!",
        }
    }

    /// Donors land on their donations; everyone else on their requests
    pub fn default_for(role: Option<UserRole>) -> Self {
        match role {
            Some(UserRole::Donor) => DashboardTab::Donations,
            _ => DashboardTab::Requests,
        }
    }
}

/// One card on the dashboard grid
#[derive(Debug, Clone, PartialEq)]
pub struct ListingCard {
    pub id: u64,
    pub title: String,
    pub status: ListingStatus,
    pub details: Vec<(&'static str, String)>,
}

impl ListingCard {
    pub fn status_class(&self) -> String {
        format!("card-status status-{}", self.status.as_str())
    }
}

pub fn cards_for(board: &ListingBoard, tab: DashboardTab) -> Vec<ListingCard> {
    match tab {
        DashboardTab::Donations => board.donations().iter().map(donation_card).collect(),
        DashboardTab::Requests => board.requests().iter().map(request_card).collect(),
        DashboardTab::Available => board.available_food().iter().map(available_card).collect(),
    }
}

fn donation_card(donation: &Donation) -> ListingCard {
    ListingCard {
        id: donation.id,
        title: donation.food_type.clone(),
        status: donation.status,
        details: vec![
            ("Quantity:", donation.quantity.clone()),
            ("Expiry:", format_date(&donation.expiry_date)),
            ("Location:", donation.pickup_location.clone()),
            ("Submitted:", format_date(&donation.date_submitted)),
        ],
    }
}

fn request_card(request: &FoodRequest) -> ListingCard {
    ListingCard {
        id: request.id,
        title: request.org_name.clone(),
        status: request.status,
        details: vec![
            ("Type:", request.org_type.clone()),
            ("People:", request.people_count.to_string()),
            ("Urgency:", request.urgency.as_str().to_string()),
            ("Submitted:", format_date(&request.date_submitted)),
        ],
    }
}

fn available_card(food: &Donation) -> ListingCard {
    ListingCard {
        id: food.id,
        title: food.food_type.clone(),
        status: food.status,
        details: vec![
            ("Quantity:", food.quantity.clone()),
            ("Expiry:", format_date(&food.expiry_date)),
            ("Location:", food.pickup_location.clone()),
            ("Donor:", food.donor.clone()),
        ],
    }
}

/// Format an ISO date or RFC 3339 timestamp as "Jan 20, 2024"
pub fn format_date(value: &str) -> String {
    let date = DateTime::parse_from_rfc3339(value)
        .map(|dt| dt.date_naive())
        .or_else(|_| NaiveDate::parse_from_str(value, "%Y-%m-%d"));
    match date {
        Ok(date) => date.format("%b %-d, %Y").to_string(),
        Err(_) => value.to_string(),
    }
}

fn field(values: &FormValues, name: &str) -> String {
    values.get(name).map(|v| v.trim().to_string()).unwrap_or_default()
}

/// Build a pending donation from validated form values
pub fn donation_from_form(values: &FormValues, submitted_at: DateTime<Utc>, donor: &str) -> Donation {
    Donation {
        id: submitted_at.timestamp_millis() as u64,
        food_type: field(values, "foodType"),
        quantity: field(values, "quantity"),
        expiry_date: field(values, "expiryDate"),
        pickup_location: field(values, "pickupLocation"),
        description: field(values, "description"),
        contact_phone: field(values, "contactPhone"),
        status: ListingStatus::Pending,
        date_submitted: submitted_at.to_rfc3339(),
        donor: donor.to_string(),
    }
}

/// Build a pending request from validated form values
pub fn request_from_form(
    values: &FormValues,
    submitted_at: DateTime<Utc>,
    organization: &str,
) -> Result<FoodRequest, String> {
    let people_count = field(values, "peopleCount")
        .parse::<u32>()
        .map_err(|e| format!("Invalid people count: {}", e))?;
    let urgency = field(values, "urgent").parse::<Urgency>()?;

    Ok(FoodRequest {
        id: submitted_at.timestamp_millis() as u64,
        org_name: field(values, "orgName"),
        org_type: field(values, "orgType"),
        people_count,
        food_needs: field(values, "foodNeeds"),
        delivery_address: field(values, "deliveryAddress"),
        urgency,
        org_contact: field(values, "orgContact"),
        status: ListingStatus::Pending,
        date_submitted: submitted_at.to_rfc3339(),
        organization: organization.to_string(),
    })
}
