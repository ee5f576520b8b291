use wanderlust_core::{CurrencyRateTable, Listing, ListingDetail, PriceTag, WeatherOutcome, WeatherSnapshot};

pub fn print_weather(query: &str, outcome: &WeatherOutcome) {
    match outcome {
        WeatherOutcome::Primary(snapshot) => print_snapshot(snapshot),
        WeatherOutcome::Fallback(snapshot) => {
            println!("Could not find weather for \"{}\"; showing the default city.", query.trim());
            print_snapshot(snapshot);
        }
        WeatherOutcome::Unavailable => println!("Weather is currently unavailable."),
    }
}

fn print_snapshot(w: &WeatherSnapshot) {
    println!("Weather in {}, {}", w.city, w.country);
    println!("  {}°C (feels like {}°C), {}", w.temp_c, w.feels_like_c, w.description);
    println!("  Humidity: {}%   Wind: {} m/s", w.humidity_pct, w.wind_speed);
    println!("  Sunrise: {}   Sunset: {}", w.sunrise, w.sunset);
    println!("  Icon: {}", w.icon_url);
}

pub fn print_rates(table: &CurrencyRateTable) {
    println!("Rates per 1 {}:", table.base);
    for (code, rate) in &table.rates {
        println!("  {code}  {rate}");
    }
}

pub fn print_listings(listings: &[Listing], prices: &[PriceTag]) {
    if listings.is_empty() {
        println!("No listings found.");
        return;
    }
    for (listing, price) in listings.iter().zip(prices) {
        println!("[{}] {} ({}) {}", listing.id, listing.title, place(listing), price.text);
    }
}

pub fn print_listing_detail(detail: &ListingDetail, price: &str) {
    let listing = &detail.listing;
    println!("{}", listing.title);
    println!("{}", place(listing));
    if !listing.description.is_empty() {
        println!();
        println!("{}", listing.description);
    }
    println!();
    println!("{price}");

    // No panel at all when weather could not be fetched.
    if let Some(weather) = &detail.weather {
        println!();
        print_snapshot(weather);
    }
}

fn place(listing: &Listing) -> String {
    match (listing.location.trim(), listing.country.trim()) {
        ("", "") => "location unknown".to_string(),
        (loc, "") => loc.to_string(),
        ("", country) => country.to_string(),
        (loc, country) => format!("{loc}, {country}"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn listing(location: &str, country: &str) -> Listing {
        Listing {
            id: "1".into(),
            title: "Cottage".into(),
            description: String::new(),
            location: location.into(),
            country: country.into(),
            price: 0.0,
        }
    }

    #[test]
    fn place_joins_known_parts() {
        assert_eq!(place(&listing("Goa", "India")), "Goa, India");
        assert_eq!(place(&listing(" ", "India")), "India");
        assert_eq!(place(&listing("Goa", "")), "Goa");
        assert_eq!(place(&listing("", "")), "location unknown");
    }
}
