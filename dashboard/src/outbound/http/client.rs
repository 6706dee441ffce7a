//! Reqwest-backed dashboard API adapter.
//!
//! This adapter owns transport details only: URL building, bearer
//! authentication, request serialisation, HTTP error mapping and JSON
//! decoding into domain records. It implements every API port, so one client
//! satisfies [`crate::domain::ports::DashboardApi`].

use std::time::Duration;

use async_trait::async_trait;
use pagination::{Page, PageRequest};
use reqwest::multipart::{Form, Part};
use reqwest::{Client, Method, RequestBuilder, StatusCode, Url};
use serde::Serialize;
use serde::de::DeserializeOwned;

use super::dto::{
    AckDto, ActivationDataDto, CityDto, CountryBodyDto, CountryDto, DataEnvelopeDto, EmailDto,
    ErrorBodyDto, ListDto, LoginDataDto, LoginRequestDto, MappingDto, NameDto, NewCityDto,
    NewMappingDto, NewUserDto, OrgUnitDto, PageEnvelopeDto, ProductDto, ProductUpdateDto,
    RegionBodyDto, RegionDto, ResetPasswordDto, SesIdDto, UserDto, UserTypeDto, UserUpdateDto,
    VerifiedEmailDto, VerifyEmailDto,
};
use crate::domain::ports::{
    ApiError, AuthApi, GeographyApi, MappingsApi, MutationAck, OrganizationApi, ProductsApi,
    UsersApi, VerifiedEmail,
};
use crate::domain::{
    ActivationChallenge, AuthToken, City, Country, CountryUpdate, DemoProduct, EmailAddress,
    EmailVerification, EntityId, ImportFile, LoginCredentials, LoginResponse, MappedProduct,
    NewCity, NewCountry, NewMapping, NewOrgUnit, NewRegion, NewUser, OrgUnit, OrgUnitKind,
    PasswordReset, ProductUpdate, Region, RegionUpdate, User, UserFilter, UserType, UserUpdate,
};

/// Countries are fetched in one page of this size.
const COUNTRY_PAGE_SIZE: u32 = 200;

/// Mappings are fetched in one page of this size.
const MAPPING_PAGE_SIZE: u32 = 1000;

/// Dashboard API adapter performing HTTP requests against one base URL.
#[derive(Debug, Clone)]
pub struct HttpApiClient {
    client: Client,
    base: Url,
}

impl HttpApiClient {
    /// Build an adapter for `base`, optionally bounding every request.
    /// ```rust,ignore
    /// let client = HttpApiClient::new(base, Some(Duration::from_secs(30)));
    /// assert!(client.is_ok() || client.is_err());
    /// ```
    /// # Errors
    ///
    /// Returns an error when the reqwest client cannot be constructed.
    pub fn new(base: Url, timeout: Option<Duration>) -> Result<Self, reqwest::Error> {
        let mut builder = Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        Ok(Self {
            client: builder.build()?,
            base: directory_url(base),
        })
    }

    /// Base URL every path is resolved against.
    pub fn base_url(&self) -> &Url {
        &self.base
    }

    fn url(&self, path: &str) -> Result<Url, ApiError> {
        self.base
            .join(path.trim_start_matches('/'))
            .map_err(|error| ApiError::transport(format!("invalid endpoint {path}: {error}")))
    }

    /// `collection/<id>`, with the id percent-encoded as one path segment.
    fn entity_url(&self, collection: &str, id: &EntityId) -> Result<Url, ApiError> {
        if matches!(id.as_str(), "." | "..") {
            return Err(ApiError::transport(format!(
                "invalid endpoint {collection}/{id}: dot segments cannot name a record"
            )));
        }
        let mut url = self.url(collection)?;
        url.path_segments_mut()
            .map_err(|()| {
                ApiError::transport(format!("base url {} cannot hold path segments", self.base))
            })?
            .push(id.as_str());
        Ok(url)
    }

    fn request(&self, method: Method, url: Url, token: Option<&AuthToken>) -> RequestBuilder {
        let builder = self
            .client
            .request(method, url)
            .header(reqwest::header::ACCEPT, "application/json");
        match token {
            Some(token) => builder.bearer_auth(token.expose()),
            None => builder,
        }
    }

    async fn get<T: DeserializeOwned>(&self, token: &AuthToken, url: Url) -> Result<T, ApiError> {
        exchange(self.request(Method::GET, url, Some(token))).await
    }

    async fn send_json<B, T>(
        &self,
        method: Method,
        url: Url,
        token: Option<&AuthToken>,
        body: &B,
    ) -> Result<T, ApiError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        exchange(self.request(method, url, token).json(body)).await
    }

    async fn write<B: Serialize + ?Sized>(
        &self,
        method: Method,
        url: Url,
        token: Option<&AuthToken>,
        body: &B,
    ) -> Result<MutationAck, ApiError> {
        let ack: AckDto = self.send_json(method, url, token, body).await?;
        Ok(acknowledge(ack, "Saved"))
    }

    async fn delete(&self, token: &AuthToken, url: Url) -> Result<MutationAck, ApiError> {
        let ack: AckDto = exchange(self.request(Method::DELETE, url, Some(token))).await?;
        Ok(acknowledge(ack, "Deleted"))
    }
}

fn directory_url(mut base: Url) -> Url {
    if !base.path().ends_with('/') {
        let path = format!("{}/", base.path());
        base.set_path(&path);
    }
    base
}

fn acknowledge(ack: AckDto, fallback: &str) -> MutationAck {
    MutationAck::new(
        ack.message
            .filter(|message| !message.trim().is_empty())
            .unwrap_or_else(|| fallback.to_owned()),
    )
}

async fn exchange<T: DeserializeOwned>(request: RequestBuilder) -> Result<T, ApiError> {
    let response = request.send().await.map_err(map_transport_error)?;
    let status = response.status();
    let body = response.bytes().await.map_err(map_transport_error)?;
    if !status.is_success() {
        return Err(map_status_error(status, body.as_ref()));
    }
    decode(body.as_ref())
}

fn decode<T: DeserializeOwned>(body: &[u8]) -> Result<T, ApiError> {
    let body = if body.trim_ascii().is_empty() {
        b"{}".as_slice()
    } else {
        body
    };
    serde_json::from_slice(body).map_err(|error| ApiError::decode(error.to_string()))
}

fn convert<T, U>(value: T, f: impl FnOnce(T) -> Result<U, String>) -> Result<U, ApiError> {
    f(value).map_err(ApiError::decode)
}

fn convert_all<T, U>(
    items: Vec<T>,
    f: impl FnMut(T) -> Result<U, String>,
) -> Result<Vec<U>, ApiError> {
    items
        .into_iter()
        .map(f)
        .collect::<Result<Vec<_>, _>>()
        .map_err(ApiError::decode)
}

fn map_transport_error(error: reqwest::Error) -> ApiError {
    if error.is_timeout() {
        ApiError::timeout(error.to_string())
    } else {
        ApiError::transport(error.to_string())
    }
}

fn map_status_error(status: StatusCode, body: &[u8]) -> ApiError {
    let message = server_message(body).unwrap_or_else(|| {
        let preview = body_preview(body);
        if preview.is_empty() {
            format!("status {}", status.as_u16())
        } else {
            format!("status {}: {}", status.as_u16(), preview)
        }
    });

    match status {
        StatusCode::UNAUTHORIZED => ApiError::unauthorized(message),
        StatusCode::FORBIDDEN => ApiError::forbidden(message),
        StatusCode::NOT_FOUND => ApiError::not_found(message),
        StatusCode::REQUEST_TIMEOUT | StatusCode::GATEWAY_TIMEOUT => ApiError::timeout(message),
        _ => ApiError::rejected(status.as_u16(), message),
    }
}

fn server_message(body: &[u8]) -> Option<String> {
    serde_json::from_slice::<ErrorBodyDto>(body)
        .ok()
        .and_then(|dto| dto.message)
        .map(|message| message.trim().to_owned())
        .filter(|message| !message.is_empty())
}

fn body_preview(body: &[u8]) -> String {
    const PREVIEW_CHAR_LIMIT: usize = 160;

    let compact = String::from_utf8_lossy(body)
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ");
    let preview = compact.chars().take(PREVIEW_CHAR_LIMIT).collect::<String>();
    if compact.chars().count() > PREVIEW_CHAR_LIMIT {
        format!("{preview}...")
    } else {
        preview
    }
}

fn org_unit_paths(kind: OrgUnitKind) -> (&'static str, &'static str, &'static str) {
    match kind {
        OrgUnitKind::Department => (
            "organization/getDepartment",
            "organization/addDepartment",
            "organization/department",
        ),
        OrgUnitKind::Designation => (
            "organization/getDesignation",
            "organization/addDesignation",
            "organization/designation",
        ),
    }
}

#[async_trait]
impl AuthApi for HttpApiClient {
    async fn login(&self, credentials: &LoginCredentials) -> Result<LoginResponse, ApiError> {
        let body = LoginRequestDto {
            ses_id: credentials.ses_id(),
            password: credentials.password(),
            lat: credentials.latitude(),
            log: credentials.longitude(),
            device_type: credentials.device_type(),
        };
        let envelope: DataEnvelopeDto<LoginDataDto> = self
            .send_json(Method::POST, self.url("users/login")?, None, &body)
            .await?;
        let (token, user) = convert(envelope.data, LoginDataDto::into_parts)?;
        Ok(LoginResponse {
            token: AuthToken::new(token),
            user,
            message: envelope.message.unwrap_or_default(),
        })
    }

    async fn forgot_password(&self, ses_id: &str) -> Result<MutationAck, ApiError> {
        self.write(
            Method::POST,
            self.url("users/forgot-password")?,
            None,
            &SesIdDto { ses_id },
        )
        .await
    }

    async fn reset_password(&self, reset: &PasswordReset) -> Result<MutationAck, ApiError> {
        let body = ResetPasswordDto {
            token: reset.token(),
            password: reset.password(),
        };
        self.write(Method::POST, self.url("users/reset-password")?, None, &body)
            .await
    }

    async fn send_activation_email(
        &self,
        email: &EmailAddress,
    ) -> Result<ActivationChallenge, ApiError> {
        let envelope: DataEnvelopeDto<ActivationDataDto> = self
            .send_json(
                Method::POST,
                self.url("users/send-activation-email")?,
                None,
                &EmailDto {
                    email: email.as_str(),
                },
            )
            .await?;
        Ok(ActivationChallenge {
            token: envelope.data.token,
            expires_in: envelope.data.expires_in,
            message: envelope.message.unwrap_or_default(),
        })
    }

    async fn verify_email(
        &self,
        verification: &EmailVerification,
    ) -> Result<VerifiedEmail, ApiError> {
        let body = VerifyEmailDto {
            email: verification.email.as_str(),
            otp: &verification.otp,
            token: &verification.token,
        };
        let dto: VerifiedEmailDto = self
            .send_json(Method::POST, self.url("users/verify-email")?, None, &body)
            .await?;
        Ok(VerifiedEmail {
            token: dto.token,
            message: dto.message.unwrap_or_default(),
        })
    }
}

#[async_trait]
impl UsersApi for HttpApiClient {
    async fn list_users(
        &self,
        token: &AuthToken,
        page: PageRequest,
    ) -> Result<Page<User>, ApiError> {
        let mut url = self.url("users")?;
        page.append_to(&mut url);
        let envelope: PageEnvelopeDto<UserDto> = self.get(token, url).await?;
        envelope
            .into_page(page, UserDto::into_domain)
            .map_err(ApiError::decode)
    }

    async fn all_users(&self, token: &AuthToken) -> Result<Vec<User>, ApiError> {
        let list: ListDto<UserDto> = self.get(token, self.url("users/allUsers")?).await?;
        convert_all(list.into_items(), UserDto::into_domain)
    }

    async fn users_by_field(
        &self,
        token: &AuthToken,
        filter: &UserFilter,
    ) -> Result<Vec<User>, ApiError> {
        let mut url = self.url("users/getUserByField")?;
        url.query_pairs_mut()
            .append_pair("region_id", filter.region.as_str())
            .append_pair("country_id", filter.country.as_str())
            .append_pair("department", &filter.department)
            .append_pair("designation", &filter.designation);
        let list: ListDto<UserDto> = self.get(token, url).await?;
        convert_all(list.into_items(), UserDto::into_domain)
    }

    async fn register(&self, user: &NewUser) -> Result<MutationAck, ApiError> {
        self.write(Method::POST, self.url("users/register")?, None, &NewUserDto::from(user))
            .await
    }

    async fn create_user(
        &self,
        token: &AuthToken,
        user: &NewUser,
    ) -> Result<MutationAck, ApiError> {
        self.write(
            Method::POST,
            self.url("users/register")?,
            Some(token),
            &NewUserDto::from(user),
        )
        .await
    }

    async fn update_user(
        &self,
        token: &AuthToken,
        id: &EntityId,
        update: &UserUpdate,
    ) -> Result<MutationAck, ApiError> {
        self.write(
            Method::PATCH,
            self.entity_url("users", id)?,
            Some(token),
            &UserUpdateDto::from(update),
        )
        .await
    }

    async fn delete_user(&self, token: &AuthToken, id: &EntityId) -> Result<MutationAck, ApiError> {
        self.delete(token, self.entity_url("users", id)?).await
    }

    async fn list_user_types(&self, token: &AuthToken) -> Result<Vec<UserType>, ApiError> {
        let list: ListDto<UserTypeDto> = self.get(token, self.url("user-types")?).await?;
        convert_all(list.into_items(), UserTypeDto::into_domain)
    }
}

#[async_trait]
impl GeographyApi for HttpApiClient {
    async fn list_regions(&self, token: &AuthToken) -> Result<Vec<Region>, ApiError> {
        let list: ListDto<RegionDto> = self.get(token, self.url("regions")?).await?;
        convert_all(list.into_items(), RegionDto::into_domain)
    }

    async fn create_region(
        &self,
        token: &AuthToken,
        region: &NewRegion,
    ) -> Result<MutationAck, ApiError> {
        self.write(
            Method::POST,
            self.url("regions")?,
            Some(token),
            &RegionBodyDto::from(region),
        )
        .await
    }

    async fn update_region(
        &self,
        token: &AuthToken,
        id: &EntityId,
        update: &RegionUpdate,
    ) -> Result<MutationAck, ApiError> {
        self.write(
            Method::PATCH,
            self.entity_url("regions", id)?,
            Some(token),
            &RegionBodyDto::from(update),
        )
        .await
    }

    async fn delete_region(
        &self,
        token: &AuthToken,
        id: &EntityId,
    ) -> Result<MutationAck, ApiError> {
        self.delete(token, self.entity_url("regions", id)?).await
    }

    async fn list_countries(
        &self,
        token: &AuthToken,
        region: &EntityId,
    ) -> Result<Vec<Country>, ApiError> {
        let mut url = self.url("countries")?;
        url.query_pairs_mut()
            .append_pair("region_id", region.as_str())
            .append_pair("size", &COUNTRY_PAGE_SIZE.to_string())
            .append_pair("page", "1");
        let list: ListDto<CountryDto> = self.get(token, url).await?;
        convert_all(list.into_items(), CountryDto::into_domain)
    }

    async fn create_country(
        &self,
        token: &AuthToken,
        country: &NewCountry,
    ) -> Result<MutationAck, ApiError> {
        self.write(
            Method::POST,
            self.url("countries")?,
            Some(token),
            &CountryBodyDto::from(country),
        )
        .await
    }

    async fn update_country(
        &self,
        token: &AuthToken,
        id: &EntityId,
        update: &CountryUpdate,
    ) -> Result<MutationAck, ApiError> {
        self.write(
            Method::PATCH,
            self.entity_url("countries", id)?,
            Some(token),
            &CountryBodyDto::from(update),
        )
        .await
    }

    async fn list_cities(
        &self,
        token: &AuthToken,
        country: &EntityId,
    ) -> Result<Vec<City>, ApiError> {
        let mut url = self.url("cities")?;
        url.query_pairs_mut()
            .append_pair("country_id", country.as_str());
        let list: ListDto<CityDto> = self.get(token, url).await?;
        convert_all(list.into_items(), CityDto::into_domain)
    }

    async fn create_city(&self, token: &AuthToken, city: &NewCity) -> Result<MutationAck, ApiError> {
        self.write(Method::POST, self.url("cities")?, Some(token), &NewCityDto::from(city))
            .await
    }
}

#[async_trait]
impl OrganizationApi for HttpApiClient {
    async fn list_org_units(
        &self,
        token: &AuthToken,
        kind: OrgUnitKind,
    ) -> Result<Vec<OrgUnit>, ApiError> {
        let (list_path, _, _) = org_unit_paths(kind);
        let list: ListDto<OrgUnitDto> = self.get(token, self.url(list_path)?).await?;
        convert_all(list.into_items(), OrgUnitDto::into_domain)
    }

    async fn add_org_unit(
        &self,
        token: &AuthToken,
        unit: &NewOrgUnit,
    ) -> Result<MutationAck, ApiError> {
        let (_, add_path, _) = org_unit_paths(unit.kind());
        let ack: AckDto = self
            .send_json(
                Method::POST,
                self.url(add_path)?,
                Some(token),
                &NameDto { name: unit.name() },
            )
            .await?;
        Ok(acknowledge(
            ack,
            &format!("Added {} {}", unit.kind(), unit.name()),
        ))
    }

    async fn import_org_units(
        &self,
        token: &AuthToken,
        kind: OrgUnitKind,
        file: &ImportFile,
    ) -> Result<MutationAck, ApiError> {
        let (_, _, import_path) = org_unit_paths(kind);
        let part = Part::bytes(file.bytes().to_vec()).file_name(file.file_name().to_owned());
        let form = Form::new().part("file", part);
        let url = self.url(import_path)?;
        let ack: AckDto = exchange(self.request(Method::POST, url, Some(token)).multipart(form))
            .await?;
        Ok(acknowledge(ack, "Imported"))
    }
}

#[async_trait]
impl ProductsApi for HttpApiClient {
    async fn list_products(
        &self,
        token: &AuthToken,
        page: PageRequest,
    ) -> Result<Page<DemoProduct>, ApiError> {
        let mut url = self.url("demo-products")?;
        page.append_to(&mut url);
        let envelope: PageEnvelopeDto<ProductDto> = self.get(token, url).await?;
        envelope
            .into_page(page, ProductDto::into_domain)
            .map_err(ApiError::decode)
    }

    async fn product(&self, token: &AuthToken, id: &EntityId) -> Result<DemoProduct, ApiError> {
        let envelope: DataEnvelopeDto<ProductDto> = self
            .get(token, self.entity_url("demo-products", id)?)
            .await?;
        convert(envelope.data, ProductDto::into_domain)
    }

    async fn update_product(
        &self,
        token: &AuthToken,
        id: &EntityId,
        update: &ProductUpdate,
    ) -> Result<MutationAck, ApiError> {
        self.write(
            Method::PATCH,
            self.entity_url("demo-products", id)?,
            Some(token),
            &ProductUpdateDto::from(update),
        )
        .await
    }

    async fn delete_product(
        &self,
        token: &AuthToken,
        id: &EntityId,
    ) -> Result<MutationAck, ApiError> {
        self.delete(token, self.entity_url("demo-products", id)?).await
    }
}

#[async_trait]
impl MappingsApi for HttpApiClient {
    async fn list_mappings(&self, token: &AuthToken) -> Result<Vec<MappedProduct>, ApiError> {
        let mut url = self.url("user-demo-mapping")?;
        url.query_pairs_mut()
            .append_pair("page", "1")
            .append_pair("size", &MAPPING_PAGE_SIZE.to_string());
        let list: ListDto<MappingDto> = self.get(token, url).await?;
        convert_all(list.into_items(), MappingDto::into_domain)
    }

    async fn create_mapping(
        &self,
        token: &AuthToken,
        mapping: &NewMapping,
    ) -> Result<MutationAck, ApiError> {
        self.write(
            Method::POST,
            self.url("user-demo-mapping")?,
            Some(token),
            &NewMappingDto::from(mapping),
        )
        .await
    }

    async fn delete_mapping(
        &self,
        token: &AuthToken,
        id: &EntityId,
    ) -> Result<MutationAck, ApiError> {
        self.delete(token, self.entity_url("user-demo-mapping", id)?).await
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for non-network mapping helpers.

    use super::*;
    use rstest::rstest;

    fn client(base: &str) -> HttpApiClient {
        let base = Url::parse(base).expect("valid base url");
        HttpApiClient::new(base, None).expect("client builds")
    }

    #[rstest]
    #[case::bare_host("http://localhost:5000", "http://localhost:5000/users/login")]
    #[case::prefix("http://localhost:5000/api", "http://localhost:5000/api/users/login")]
    #[case::trailing_slash("http://localhost:5000/api/", "http://localhost:5000/api/users/login")]
    fn paths_resolve_under_the_base_prefix(#[case] base: &str, #[case] expected: &str) {
        let url = client(base).url("/users/login").expect("url joins");
        assert_eq!(url.as_str(), expected);
    }

    #[rstest]
    #[case::plain("65f1c2a9b3e4d5f6a7b8c9d0", "http://h/api/users/65f1c2a9b3e4d5f6a7b8c9d0")]
    #[case::traversal("../regions/r1", "http://h/api/users/..%2Fregions%2Fr1")]
    #[case::query("u1?force=true", "http://h/api/users/u1%3Fforce=true")]
    #[case::fragment("u1#x", "http://h/api/users/u1%23x")]
    fn ids_stay_inside_their_collection(#[case] raw: &str, #[case] expected: &str) {
        let id = EntityId::new(raw).expect("valid id");
        let url = client("http://h/api").entity_url("users", &id).expect("url builds");
        assert_eq!(url.as_str(), expected);
        assert_eq!(url.query(), None);
        assert_eq!(url.fragment(), None);
    }

    #[rstest]
    #[case(".")]
    #[case("..")]
    fn dot_segment_ids_are_refused(#[case] raw: &str) {
        let id = EntityId::new(raw).expect("valid id");
        let error = client("http://h/api")
            .entity_url("users", &id)
            .expect_err("dot segments must not address the collection");
        assert!(matches!(error, ApiError::Transport { .. }));
    }

    #[rstest]
    #[case::unauthorized(StatusCode::UNAUTHORIZED, "Unauthorized")]
    #[case::forbidden(StatusCode::FORBIDDEN, "Forbidden")]
    #[case::not_found(StatusCode::NOT_FOUND, "NotFound")]
    #[case::gateway_timeout(StatusCode::GATEWAY_TIMEOUT, "Timeout")]
    #[case::conflict(StatusCode::CONFLICT, "Rejected")]
    #[case::server_error(StatusCode::INTERNAL_SERVER_ERROR, "Rejected")]
    fn maps_http_statuses_to_expected_port_errors(
        #[case] status: StatusCode,
        #[case] expected: &str,
    ) {
        let error = map_status_error(status, br#"{"message":"Region already exists"}"#);
        let matched = match expected {
            "Unauthorized" => matches!(error, ApiError::Unauthorized { .. }),
            "Forbidden" => matches!(error, ApiError::Forbidden { .. }),
            "NotFound" => matches!(error, ApiError::NotFound { .. }),
            "Timeout" => matches!(error, ApiError::Timeout { .. }),
            "Rejected" => matches!(error, ApiError::Rejected { status: s, .. } if s == status.as_u16()),
            _ => panic!("unsupported test expectation: {expected}"),
        };
        assert!(matched, "{status} mapped to {error:?}");
    }

    #[rstest]
    fn server_message_is_passed_through() {
        let error = map_status_error(
            StatusCode::CONFLICT,
            br#"{ "success": false, "message": "Region already exists" }"#,
        );
        assert_eq!(error.user_message(), "Region already exists");
    }

    #[rstest]
    #[case::html(b"<html> <body>Bad   gateway</body> </html>".as_slice(), "status 502: <html> <body>Bad gateway</body> </html>")]
    #[case::empty(b"".as_slice(), "status 502")]
    #[case::blank_message(br#"{"message":"  "}"#.as_slice(), r#"status 502: {"message":" "}"#)]
    fn falls_back_to_a_body_preview(#[case] body: &[u8], #[case] expected: &str) {
        let error = map_status_error(StatusCode::BAD_GATEWAY, body);
        assert_eq!(error.user_message(), expected);
    }

    #[rstest]
    fn long_bodies_are_truncated() {
        let body = "x".repeat(400);
        let preview = body_preview(body.as_bytes());
        assert_eq!(preview.chars().count(), 163);
        assert!(preview.ends_with("..."));
    }

    #[rstest]
    fn empty_write_responses_decode_as_acknowledgements() {
        let ack: AckDto = decode(b"  ").expect("empty body decodes");
        assert_eq!(acknowledge(ack, "Deleted"), MutationAck::new("Deleted"));
    }

    #[rstest]
    fn malformed_payloads_map_to_decode_errors() {
        let error = decode::<ListDto<RegionDto>>(b"{\"data\": 3}").expect_err("must fail");
        assert!(matches!(error, ApiError::Decode { .. }));
    }

    #[rstest]
    #[case(OrgUnitKind::Department, "organization/getDepartment", "organization/department")]
    #[case(OrgUnitKind::Designation, "organization/getDesignation", "organization/designation")]
    fn org_unit_endpoints_follow_kind(
        #[case] kind: OrgUnitKind,
        #[case] list: &str,
        #[case] import: &str,
    ) {
        let (list_path, _, import_path) = org_unit_paths(kind);
        assert_eq!((list_path, import_path), (list, import));
    }
}
