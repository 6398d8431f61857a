use async_trait::async_trait;

use super::HotelInventory;
use crate::error::Result;
use crate::types::{ExtractedParameters, HotelRecord};

struct Sample {
    id: &'static str,
    name: &'static str,
    address: &'static str,
    city: &'static str,
    country: &'static str,
    coordinates: (f64, f64),
    price: f64,
    rating: f64,
    review_score: f64,
    review_count: u64,
    amenities: &'static [&'static str],
    description: &'static str,
    image: &'static str,
}

const SAMPLES: &[Sample] = &[
    Sample {
        id: "mock-paris-01",
        name: "Le Petit Romantique",
        address: "12 Rue des Rosiers",
        city: "Paris",
        country: "France",
        coordinates: (48.8573, 2.3594),
        price: 190.0,
        rating: 4.7,
        review_score: 9.2,
        review_count: 1420,
        amenities: &["WiFi", "Spa", "Restaurant", "Rooftop Terrace"],
        description: "Romantic boutique hotel in Le Marais with a candle-lit wine bar and a couples spa.",
        image: "https://images.unsplash.com/photo-1590490360182-c33d57733427?w=800&h=600&fit=crop",
    },
    Sample {
        id: "mock-rome-01",
        name: "Albergo del Colosseo",
        address: "Via Labicana 24",
        city: "Rome",
        country: "Italy",
        coordinates: (41.8894, 12.4971),
        price: 180.0,
        rating: 4.5,
        review_score: 8.9,
        review_count: 2310,
        amenities: &["WiFi", "Restaurant", "Bar", "Concierge"],
        description: "Historic hotel steps from the Colosseum with a breakfast terrace over the old city.",
        image: "https://images.unsplash.com/photo-1566073771259-6a8506099945?w=800&h=600&fit=crop",
    },
    Sample {
        id: "mock-como-01",
        name: "Villa sul Lago",
        address: "Via per Cernobbio 5",
        city: "Como",
        country: "Italy",
        coordinates: (45.8206, 9.0719),
        price: 195.0,
        rating: 4.8,
        review_score: 9.4,
        review_count: 980,
        amenities: &["WiFi", "Spa", "Pool", "Private Dock", "Restaurant"],
        description: "Romantic lakeside villa on Lake Como with a private dock, infinity pool and spa.",
        image: "https://images.unsplash.com/photo-1571896349842-33c89424de2d?w=800&h=600&fit=crop",
    },
    Sample {
        id: "mock-florence-01",
        name: "Palazzo degli Uffizi Suites",
        address: "Piazzale degli Uffizi 3",
        city: "Florence",
        country: "Italy",
        coordinates: (43.7687, 11.2556),
        price: 260.0,
        rating: 4.6,
        review_score: 9.0,
        review_count: 1105,
        amenities: &["WiFi", "Concierge", "Room Service", "Bar"],
        description: "Luxury suites in a Renaissance palazzo beside the Uffizi gallery.",
        image: "https://images.unsplash.com/photo-1551882547-ff40c63fe5fa?w=800&h=600&fit=crop",
    },
    Sample {
        id: "mock-venice-01",
        name: "Ca' Canal Grande",
        address: "Fondamenta del Vin 811",
        city: "Venice",
        country: "Italy",
        coordinates: (45.4381, 12.3358),
        price: 320.0,
        rating: 4.7,
        review_score: 9.1,
        review_count: 1530,
        amenities: &["WiFi", "Gondola Pier", "Restaurant", "Bar"],
        description: "Luxury canal-front palazzo with a gondola pier and romantic balcony rooms.",
        image: "https://images.unsplash.com/photo-1582719478250-c89cae4dc85b?w=800&h=600&fit=crop",
    },
    Sample {
        id: "mock-barcelona-01",
        name: "Hotel Barceloneta Mar",
        address: "Passeig Maritim 31",
        city: "Barcelona",
        country: "Spain",
        coordinates: (41.3784, 2.1925),
        price: 150.0,
        rating: 4.3,
        review_score: 8.6,
        review_count: 2640,
        amenities: &["WiFi", "Pool", "Beach Access", "Kids Club"],
        description: "Beach hotel on the Barceloneta seafront with a rooftop pool and family rooms.",
        image: "https://images.unsplash.com/photo-1571003123894-1f0594d2b5d9?w=800&h=600&fit=crop",
    },
    Sample {
        id: "mock-london-01",
        name: "The Strand Business Hotel",
        address: "101 Strand",
        city: "London",
        country: "United Kingdom",
        coordinates: (51.5111, -0.1196),
        price: 240.0,
        rating: 4.2,
        review_score: 8.4,
        review_count: 3120,
        amenities: &["WiFi", "Business Center", "Meeting Rooms", "Fitness Center"],
        description: "Business hotel near Covent Garden with meeting rooms and a 24-hour gym.",
        image: "https://images.unsplash.com/photo-1566073771259-6a8506099945?w=800&h=600&fit=crop",
    },
    Sample {
        id: "mock-santorini-01",
        name: "Oia Cliff Suites",
        address: "Oia Caldera Path",
        city: "Santorini",
        country: "Greece",
        coordinates: (36.4618, 25.3753),
        price: 380.0,
        rating: 4.9,
        review_score: 9.6,
        review_count: 760,
        amenities: &["WiFi", "Plunge Pool", "Spa", "Breakfast"],
        description: "Cave suites in the caldera cliffs with plunge pools and sunset views, made for a romantic honeymoon.",
        image: "https://images.unsplash.com/photo-1564501049412-61c2a3083791?w=800&h=600&fit=crop",
    },
    Sample {
        id: "mock-amsterdam-01",
        name: "Canal House Budget Stay",
        address: "Prinsengracht 402",
        city: "Amsterdam",
        country: "Netherlands",
        coordinates: (52.3676, 4.8841),
        price: 85.0,
        rating: 3.9,
        review_score: 7.8,
        review_count: 2890,
        amenities: &["WiFi", "Bike Rental", "Shared Kitchen"],
        description: "Budget rooms in a canal house with free bikes and a shared kitchen. Pet friendly.",
        image: "https://images.unsplash.com/photo-1590490360182-c33d57733427?w=800&h=600&fit=crop",
    },
    Sample {
        id: "mock-vienna-01",
        name: "Hotel Wiener Spa",
        address: "Schubertring 9",
        city: "Vienna",
        country: "Austria",
        coordinates: (48.2025, 16.3765),
        price: 170.0,
        rating: 4.4,
        review_score: 8.8,
        review_count: 1650,
        amenities: &["WiFi", "Spa", "Sauna", "Thermal Pool", "Cafe"],
        description: "Spa hotel on the Ringstrasse with thermal pools, a sauna and a classic coffee house.",
        image: "https://images.unsplash.com/photo-1582719478250-c89cae4dc85b?w=800&h=600&fit=crop",
    },
];

/// Fixed sample inventory served when no provider key is configured.
/// Returns the same ten hotels for every query.
#[derive(Debug, Clone, Default)]
pub struct MockInventory;

impl MockInventory {
    pub fn new() -> Self {
        Self
    }

    pub fn hotels() -> Vec<HotelRecord> {
        SAMPLES.iter().map(Sample::to_record).collect()
    }
}

impl Sample {
    fn to_record(&self) -> HotelRecord {
        HotelRecord {
            id: self.id.to_string(),
            name: self.name.to_string(),
            address: format!("{}, {}", self.address, self.city),
            city: self.city.to_string(),
            country: self.country.to_string(),
            latitude: Some(self.coordinates.0),
            longitude: Some(self.coordinates.1),
            price: Some(self.price),
            currency: Some("EUR".to_string()),
            rating: Some(self.rating),
            review_score: Some(self.review_score),
            review_count: Some(self.review_count),
            amenities: self.amenities.iter().map(|a| a.to_string()).collect(),
            description: self.description.to_string(),
            images: vec![self.image.to_string()],
            booking_url: Some(format!("https://www.booking.com/hotel/{}.html", self.id)),
        }
    }
}

#[async_trait]
impl HotelInventory for MockInventory {
    fn name(&self) -> &'static str {
        "mock"
    }

    async fn search(&self, params: &ExtractedParameters) -> Result<Vec<HotelRecord>> {
        tracing::info!(location = ?params.location, "serving sample inventory");
        Ok(Self::hotels())
    }
}
