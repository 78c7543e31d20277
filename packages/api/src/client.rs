//! `reqwest`-backed implementation of [`CrimeDataApi`].
//!
//! Requests are built separately from being sent so the exact URLs
//! (path + encoded query string) can be checked without a running server.
//! There is no retry layer: a failed request is reported to the caller,
//! which logs it and keeps whatever it rendered last.

use async_trait::async_trait;
use chrono::NaiveDate;
use crime_atlas_api_models::{
    AggregateQuery, AggregateResponse, ApiHealth, CategoriesResponse, EvolutionQuery,
    EvolutionResponse, PeriodsResponse,
};
use crime_atlas_crime_models::{CrimeRecord, GeoLevel, LocationSeries};
use serde::de::DeserializeOwned;

use crate::{ApiConfig, ApiError, CrimeDataApi};

/// HTTP client for the `/api/mapa` endpoints.
#[derive(Debug, Clone)]
pub struct HttpCrimeDataApi {
    client: reqwest::Client,
    config: ApiConfig,
}

impl HttpCrimeDataApi {
    /// Creates a client with a fresh connection pool.
    #[must_use]
    pub fn new(config: ApiConfig) -> Self {
        Self::with_client(reqwest::Client::new(), config)
    }

    /// Creates a client reusing an existing `reqwest` connection pool.
    #[must_use]
    pub const fn with_client(client: reqwest::Client, config: ApiConfig) -> Self {
        Self { client, config }
    }

    /// Creates a client configured from `CRIME_ATLAS_API_URL`.
    #[must_use]
    pub fn from_env() -> Self {
        Self::new(ApiConfig::from_env())
    }

    /// The base URL requests are sent to.
    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.config.base_url
    }

    /// Queries the backend's `/health` endpoint.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError`] if the request or response parsing fails.
    pub async fn health(&self) -> Result<ApiHealth, ApiError> {
        let request = self.client.get(self.endpoint("/health")?).build()?;
        self.execute_json(request).await
    }

    fn endpoint(&self, path: &str) -> Result<reqwest::Url, ApiError> {
        let url = format!("{}{path}", self.config.base_url);
        reqwest::Url::parse(&url).map_err(|e| ApiError::InvalidUrl {
            url,
            message: e.to_string(),
        })
    }

    pub(crate) fn periods_request(&self) -> Result<reqwest::Request, ApiError> {
        Ok(self
            .client
            .get(self.endpoint("/api/mapa/periodos")?)
            .build()?)
    }

    pub(crate) fn categories_request(&self) -> Result<reqwest::Request, ApiError> {
        Ok(self
            .client
            .get(self.endpoint("/api/mapa/tipologias")?)
            .build()?)
    }

    pub(crate) fn aggregate_request(
        &self,
        level: GeoLevel,
        period: NaiveDate,
        category: Option<&str>,
    ) -> Result<reqwest::Request, ApiError> {
        let query = AggregateQuery {
            periodo: period,
            tipologia: non_empty(category),
        };
        Ok(self
            .client
            .get(self.endpoint(&format!("/api/mapa/delitos/agregado/{level}"))?)
            .query(&query)
            .build()?)
    }

    pub(crate) fn evolution_request(
        &self,
        level: GeoLevel,
        geo1: &str,
        geo2: Option<&str>,
        category: Option<&str>,
    ) -> Result<reqwest::Request, ApiError> {
        let query = EvolutionQuery {
            geo1: geo1.to_string(),
            geo2: non_empty(geo2),
            tipologia: non_empty(category),
        };
        Ok(self
            .client
            .get(self.endpoint(&format!("/api/mapa/delitos/evolucion/{level}"))?)
            .query(&query)
            .build()?)
    }

    async fn execute_json<T: DeserializeOwned>(
        &self,
        request: reqwest::Request,
    ) -> Result<T, ApiError> {
        let url = request.url().to_string();
        log::debug!("GET {url}");

        let response = self.client.execute(request).await?;
        let status = response.status();
        if !status.is_success() {
            return Err(ApiError::Status {
                status: status.as_u16(),
                url,
            });
        }

        let body = response.text().await?;
        Ok(serde_json::from_str(&body)?)
    }
}

/// Blank selections (an empty picker value) mean "no filter".
fn non_empty(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(String::from)
}

#[async_trait]
impl CrimeDataApi for HttpCrimeDataApi {
    async fn periods(&self) -> Result<Vec<NaiveDate>, ApiError> {
        let resp: PeriodsResponse = self.execute_json(self.periods_request()?).await?;
        log::info!("Loaded {} periods", resp.periodos.len());
        Ok(resp.periodos)
    }

    async fn categories(&self) -> Result<Vec<String>, ApiError> {
        let resp: CategoriesResponse = self.execute_json(self.categories_request()?).await?;
        log::info!("Loaded {} categories", resp.tipologias.len());
        Ok(resp.tipologias)
    }

    async fn aggregate(
        &self,
        level: GeoLevel,
        period: NaiveDate,
        category: Option<&str>,
    ) -> Result<Vec<CrimeRecord>, ApiError> {
        let request = self.aggregate_request(level, period, category)?;
        let resp: AggregateResponse = self.execute_json(request).await?;
        log::info!(
            "Loaded {} aggregated rows for level={level} period={period}",
            resp.datos.len()
        );
        Ok(resp.datos.into_iter().map(Into::into).collect())
    }

    async fn evolution(
        &self,
        level: GeoLevel,
        geo1: &str,
        geo2: Option<&str>,
        category: Option<&str>,
    ) -> Result<Vec<LocationSeries>, ApiError> {
        let request = self.evolution_request(level, geo1, geo2, category)?;
        let resp: EvolutionResponse = self.execute_json(request).await?;
        Ok(resp.datos.into_iter().map(Into::into).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn api() -> HttpCrimeDataApi {
        HttpCrimeDataApi::new(ApiConfig::new("http://localhost:8000/"))
    }

    fn june_2024() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 6, 1).unwrap()
    }

    #[test]
    fn builds_periods_and_categories_urls() {
        let api = api();
        assert_eq!(
            api.periods_request().unwrap().url().as_str(),
            "http://localhost:8000/api/mapa/periodos"
        );
        assert_eq!(
            api.categories_request().unwrap().url().as_str(),
            "http://localhost:8000/api/mapa/tipologias"
        );
    }

    #[test]
    fn aggregate_url_without_category() {
        let request = api()
            .aggregate_request(GeoLevel::Region, june_2024(), None)
            .unwrap();
        assert_eq!(
            request.url().as_str(),
            "http://localhost:8000/api/mapa/delitos/agregado/ccaa?periodo=2024-06-01"
        );
    }

    #[test]
    fn aggregate_url_encodes_category() {
        let request = api()
            .aggregate_request(GeoLevel::Province, june_2024(), Some("Robos con violencia"))
            .unwrap();
        assert_eq!(
            request.url().as_str(),
            "http://localhost:8000/api/mapa/delitos/agregado/provincia\
             ?periodo=2024-06-01&tipologia=Robos+con+violencia"
        );
    }

    #[test]
    fn blank_category_is_not_sent() {
        let request = api()
            .aggregate_request(GeoLevel::Municipality, june_2024(), Some("  "))
            .unwrap();
        assert_eq!(request.url().query(), Some("periodo=2024-06-01"));
    }

    #[test]
    fn evolution_url_encodes_raw_geo_labels() {
        let request = api()
            .evolution_request(
                GeoLevel::Region,
                "CCAA 01 Andalucía",
                Some("CCAA 13 Madrid, Comunidad de"),
                None,
            )
            .unwrap();
        assert_eq!(
            request.url().as_str(),
            "http://localhost:8000/api/mapa/delitos/evolucion/ccaa\
             ?geo1=CCAA+01+Andaluc%C3%ADa&geo2=CCAA+13+Madrid%2C+Comunidad+de"
        );
    }

    #[test]
    fn evolution_url_skips_missing_second_location() {
        let request = api()
            .evolution_request(GeoLevel::National, "NACIONAL", None, Some("Hurtos"))
            .unwrap();
        assert_eq!(request.url().query(), Some("geo1=NACIONAL&tipologia=Hurtos"));
    }

    #[test]
    fn rejects_unparseable_base_url() {
        let api = HttpCrimeDataApi::new(ApiConfig::new("not a url"));
        assert!(matches!(
            api.periods_request(),
            Err(ApiError::InvalidUrl { .. })
        ));
    }

    #[tokio::test]
    async fn unreachable_backend_is_an_http_error() {
        let api = HttpCrimeDataApi::new(ApiConfig::new("http://127.0.0.1:9"));
        let result = api.periods().await;
        assert!(matches!(result, Err(ApiError::Http(_))), "{result:?}");
    }
}
