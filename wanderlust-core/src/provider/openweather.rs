use async_trait::async_trait;
use chrono::FixedOffset;
use reqwest::Client;
use serde::Deserialize;

use crate::{
    error::{WeatherError, truncate_body},
    locale::Locale,
    model::WeatherSnapshot,
};

use super::WeatherProvider;

pub const DEFAULT_BASE_URL: &str = "https://api.openweathermap.org";
const ICON_BASE_URL: &str = "https://openweathermap.org/img/wn";

#[derive(Debug, Clone)]
pub struct OpenWeatherProvider {
    api_key: String,
    base_url: String,
    locale: Locale,
    offset: FixedOffset,
    http: Client,
}

impl OpenWeatherProvider {
    pub fn new(api_key: String, locale: Locale, offset: FixedOffset) -> Self {
        Self {
            api_key,
            base_url: DEFAULT_BASE_URL.to_string(),
            locale,
            offset,
            http: Client::new(),
        }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    async fn fetch_current(&self, location: &str) -> Result<WeatherSnapshot, WeatherError> {
        let url = format!("{}/data/2.5/weather", self.base_url);
        tracing::debug!(location, "requesting current weather from OpenWeather");

        let res = self
            .http
            .get(&url)
            .query(&[("q", location), ("appid", self.api_key.as_str()), ("units", "metric")])
            .send()
            .await
            .map_err(WeatherError::Transport)?;

        let status = res.status();
        let body = res.text().await.map_err(WeatherError::Transport)?;

        if !status.is_success() {
            return Err(WeatherError::Status {
                status: status.as_u16(),
                body: truncate_body(&body),
            });
        }

        let parsed: OwCurrentResponse = serde_json::from_str(&body)
            .map_err(|e| WeatherError::Malformed(format!("invalid OpenWeather JSON: {e}")))?;

        self.to_snapshot(parsed)
    }

    fn to_snapshot(&self, parsed: OwCurrentResponse) -> Result<WeatherSnapshot, WeatherError> {
        let condition = parsed
            .weather
            .into_iter()
            .next()
            .ok_or_else(|| WeatherError::Malformed("response contained no weather entry".into()))?;

        let sunrise = self.local_time(parsed.sys.sunrise, "sunrise")?;
        let sunset = self.local_time(parsed.sys.sunset, "sunset")?;

        Ok(WeatherSnapshot {
            city: parsed.name,
            country: parsed.sys.country,
            temp_c: round_degrees(parsed.main.temp, "temp")?,
            feels_like_c: round_degrees(parsed.main.feels_like, "feels_like")?,
            humidity_pct: parsed.main.humidity,
            wind_speed: parsed.wind.speed,
            description: condition.description,
            icon_url: icon_url(&condition.icon),
            sunrise,
            sunset,
        })
    }

    fn local_time(&self, epoch_secs: i64, field: &str) -> Result<String, WeatherError> {
        self.locale
            .format_epoch_time(epoch_secs, self.offset)
            .ok_or_else(|| WeatherError::Malformed(format!("{field} timestamp out of range")))
    }
}

/// Display URL for a provider icon code, e.g. `10d`.
pub fn icon_url(icon: &str) -> String {
    format!("{ICON_BASE_URL}/{icon}@2x.png")
}

/// Rounds half away from zero to a whole degree.
fn round_degrees(value: f64, field: &str) -> Result<i32, WeatherError> {
    let rounded = value.round();
    if !rounded.is_finite() || rounded.abs() > 1000.0 {
        return Err(WeatherError::Malformed(format!("{field} out of range: {value}")));
    }
    Ok(rounded as i32)
}

#[derive(Debug, Deserialize)]
struct OwMain {
    temp: f64,
    feels_like: f64,
    humidity: u8,
}

#[derive(Debug, Deserialize)]
struct OwWeather {
    description: String,
    icon: String,
}

#[derive(Debug, Deserialize)]
struct OwWind {
    speed: f64,
}

#[derive(Debug, Deserialize)]
struct OwSys {
    country: String,
    sunrise: i64,
    sunset: i64,
}

#[derive(Debug, Deserialize)]
struct OwCurrentResponse {
    name: String,
    main: OwMain,
    weather: Vec<OwWeather>,
    wind: OwWind,
    sys: OwSys,
}

#[async_trait]
impl WeatherProvider for OpenWeatherProvider {
    async fn current(&self, location: &str) -> Result<WeatherSnapshot, WeatherError> {
        self.fetch_current(location).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn london_json() -> serde_json::Value {
        json!({
            "name": "London",
            "sys": { "country": "GB", "sunrise": 1_704_089_045, "sunset": 1_704_117_600 },
            "main": { "temp": 7.5, "feels_like": -2.5, "humidity": 81 },
            "wind": { "speed": 4.12 },
            "weather": [{ "description": "light rain", "icon": "10d" }]
        })
    }

    fn provider(server: &MockServer) -> OpenWeatherProvider {
        OpenWeatherProvider::new("TEST_KEY".into(), Locale::EnUs, FixedOffset::east_opt(0).unwrap())
            .with_base_url(server.uri())
    }

    #[tokio::test]
    async fn maps_current_weather_into_snapshot() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/data/2.5/weather"))
            .and(query_param("q", "London"))
            .and(query_param("appid", "TEST_KEY"))
            .and(query_param("units", "metric"))
            .respond_with(ResponseTemplate::new(200).set_body_json(london_json()))
            .expect(1)
            .mount(&server)
            .await;

        let snapshot = provider(&server).current("London").await.expect("snapshot");

        assert_eq!(snapshot.city, "London");
        assert_eq!(snapshot.country, "GB");
        assert_eq!(snapshot.temp_c, 8);
        assert_eq!(snapshot.feels_like_c, -3);
        assert_eq!(snapshot.humidity_pct, 81);
        assert_eq!(snapshot.wind_speed, 4.12);
        assert_eq!(snapshot.description, "light rain");
        assert_eq!(snapshot.icon_url, "https://openweathermap.org/img/wn/10d@2x.png");
        assert_eq!(snapshot.sunrise, "6:04:05 AM");
        assert_eq!(snapshot.sunset, "2:00:00 PM");
    }

    #[tokio::test]
    async fn non_success_status_is_reported() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(
                ResponseTemplate::new(404).set_body_string(r#"{"cod":"404","message":"city not found"}"#),
            )
            .mount(&server)
            .await;

        let err = provider(&server).current("Atlantis").await.unwrap_err();
        match err {
            WeatherError::Status { status, body } => {
                assert_eq!(status, 404);
                assert!(body.contains("city not found"));
            }
            other => panic!("expected status error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn missing_field_is_malformed() {
        let server = MockServer::start().await;
        let mut body = london_json();
        body.as_object_mut().unwrap().remove("sys");
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_json(body))
            .mount(&server)
            .await;

        let err = provider(&server).current("London").await.unwrap_err();
        assert!(matches!(err, WeatherError::Malformed(_)));
    }

    #[tokio::test]
    async fn empty_weather_list_is_malformed() {
        let server = MockServer::start().await;
        let mut body = london_json();
        body["weather"] = json!([]);
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_json(body))
            .mount(&server)
            .await;

        let err = provider(&server).current("London").await.unwrap_err();
        assert!(matches!(err, WeatherError::Malformed(_)));
    }

    #[tokio::test]
    async fn unreachable_provider_is_transport_error() {
        // Nothing listens on port 1.
        let p = OpenWeatherProvider::new("K".into(), Locale::EnUs, FixedOffset::east_opt(0).unwrap())
            .with_base_url("http://127.0.0.1:1");
        let err = p.current("London").await.unwrap_err();
        assert!(matches!(err, WeatherError::Transport(_)));
    }

    #[test]
    fn rounding_is_half_away_from_zero() {
        assert_eq!(round_degrees(2.5, "t").unwrap(), 3);
        assert_eq!(round_degrees(-2.5, "t").unwrap(), -3);
        assert_eq!(round_degrees(2.49, "t").unwrap(), 2);
        assert!(round_degrees(f64::NAN, "t").is_err());
    }
}
