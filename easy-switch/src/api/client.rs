//! HTTP implementation of the [`ImportApi`].

use async_trait::async_trait;
use serde::{de::DeserializeOwned, Serialize};
use serde_json::Value;
use tracing::{debug, trace};

use super::{
    Calendar, CalendarImporter, CalendarKeyPayload, ContactsImporter, CreateCalendarRequest,
    CreateMailImporterRequest, CreateTokenRequest, Error, ImportApi, ImportToken, MailImporter,
    Result,
};
use crate::{model::LaunchImportPayload, ImportType};

/// Response codes the backend uses for successful calls.
const SUCCESS_CODES: [i64; 2] = [1000, 1001];

/// Body of an importer creation request: the product being imported
/// along with its product-specific fields.
#[derive(Serialize)]
#[serde(rename_all = "PascalCase")]
struct CreateImporterRequest<'a, T: Serialize> {
    product: ImportType,
    #[serde(flatten)]
    fields: &'a T,
}

#[derive(Serialize)]
struct TokenId<'a> {
    #[serde(rename = "TokenID")]
    token_id: &'a str,
}

/// The import API reached over HTTP.
#[derive(Clone, Debug)]
pub struct HttpImportApi {
    client: http::Client,
}

impl HttpImportApi {
    /// Creates an API client authenticated with the given session.
    pub fn new(api_url: impl ToString, uid: impl ToString, access_token: impl ToString) -> Self {
        let client = http::Client::new(api_url)
            .with_header("x-pm-uid", uid)
            .with_header("Authorization", format!("Bearer {}", access_token.to_string()));

        Self { client }
    }

    /// Announces the given application version to the backend.
    pub fn with_app_version(mut self, app_version: impl ToString) -> Self {
        self.client = self.client.with_header("x-pm-appversion", app_version);
        self
    }

    pub fn base_url(&self) -> &str {
        self.client.base_url()
    }

    async fn post<B>(&self, path: &str, body: &B) -> Result<Value>
    where
        B: Serialize + Sync + ?Sized,
    {
        let res: Value = self.client.post_json(path, body).await?;
        check_code(path, res)
    }

    async fn post_for<B, T>(&self, path: &str, body: &B, field: &'static str) -> Result<T>
    where
        B: Serialize + Sync + ?Sized,
        T: DeserializeOwned,
    {
        let res = self.post(path, body).await?;
        extract(path, res, field)
    }

    async fn create_importer<T, R>(&self, kind: ImportType, fields: &T) -> Result<R>
    where
        T: Serialize + Sync,
        R: DeserializeOwned,
    {
        debug!(%kind, "creating importer");
        let req = CreateImporterRequest {
            product: kind,
            fields,
        };
        self.post_for("importer/v1/importers", &req, "Importer")
            .await
    }
}

#[async_trait]
impl ImportApi for HttpImportApi {
    async fn create_token(&self, req: &CreateTokenRequest) -> Result<ImportToken> {
        debug!(provider = ?req.provider, "creating import token");
        self.post_for("importer/v1/tokens", req, "Token").await
    }

    async fn create_mail_importer(&self, req: &CreateMailImporterRequest) -> Result<MailImporter> {
        self.create_importer(ImportType::Mail, req).await
    }

    async fn create_calendar_importer(&self, token_id: &str) -> Result<CalendarImporter> {
        self.create_importer(ImportType::Calendar, &TokenId { token_id })
            .await
    }

    async fn create_contacts_importer(&self, token_id: &str) -> Result<ContactsImporter> {
        self.create_importer(ImportType::Contacts, &TokenId { token_id })
            .await
    }

    async fn start_import_task(&self, payload: &LaunchImportPayload) -> Result<()> {
        debug!(importer_id = payload.importer_id, "starting import task");
        self.post("importer/v1/importers/start", payload).await?;
        Ok(())
    }

    async fn create_calendar(&self, req: &CreateCalendarRequest) -> Result<Calendar> {
        debug!(name = req.name, "creating calendar");
        self.post_for("calendar/v1", req, "Calendar").await
    }

    async fn create_calendar_key(
        &self,
        calendar_id: &str,
        payload: &CalendarKeyPayload,
    ) -> Result<()> {
        debug!(calendar_id, "setting up calendar key");
        let path = format!("calendar/v1/{calendar_id}/keys");
        self.post(&path, payload).await?;
        Ok(())
    }

    async fn remove_calendar(&self, calendar_id: &str) -> Result<()> {
        debug!(calendar_id, "removing calendar");
        let path = format!("calendar/v1/{calendar_id}");
        let res: Value = self.client.delete_json(&path).await?;
        check_code(&path, res)?;
        Ok(())
    }
}

/// Fails when the response carries a non-successful code.
fn check_code(path: &str, res: Value) -> Result<Value> {
    let code = res.get("Code").and_then(Value::as_i64).unwrap_or(1000);
    trace!(path, code, "received response");

    if SUCCESS_CODES.contains(&code) {
        return Ok(res);
    }

    let msg = res
        .get("Error")
        .and_then(Value::as_str)
        .unwrap_or_default()
        .to_owned();

    Err(Error::RejectedError(code, path.to_owned(), msg))
}

/// Extracts and parses the given top-level field of a response.
fn extract<T: DeserializeOwned>(path: &str, mut res: Value, field: &'static str) -> Result<T> {
    let val = res
        .get_mut(field)
        .map(Value::take)
        .ok_or_else(|| Error::MissingResponseFieldError(path.to_owned(), field))?;

    serde_json::from_value(val).map_err(|err| Error::ParseResponseError(err, path.to_owned(), field))
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::{check_code, extract, CreateImporterRequest, TokenId};
    use crate::{
        api::{CreateMailImporterRequest, Error, ImportToken, SaslMechanism},
        ImportType,
    };

    #[test]
    fn extract_token_from_response() {
        let res = json!({
            "Code": 1000,
            "Token": {
                "ID": "token-id",
                "Account": "john@gmail.com",
                "Products": ["Mail", "Contacts"],
            },
        });

        let res = check_code("importer/v1/tokens", res).unwrap();
        let token: ImportToken = extract("importer/v1/tokens", res, "Token").unwrap();
        assert_eq!(token.id, "token-id");
        assert_eq!(token.products, vec![ImportType::Mail, ImportType::Contacts]);
    }

    #[test]
    fn reject_error_code() {
        let res = json!({ "Code": 2500, "Error": "Token expired" });

        match check_code("importer/v1/tokens", res) {
            Err(Error::RejectedError(2500, path, msg)) => {
                assert_eq!(path, "importer/v1/tokens");
                assert_eq!(msg, "Token expired");
            }
            res => panic!("unexpected result {res:?}"),
        }
    }

    #[test]
    fn missing_field() {
        let res = json!({ "Code": 1000 });
        let res: Result<ImportToken, _> = extract("importer/v1/tokens", res, "Token");
        assert!(matches!(res, Err(Error::MissingResponseFieldError(_, "Token"))));
    }

    #[test]
    fn serialize_importer_requests() {
        let mail = CreateMailImporterRequest {
            token_id: "token-id".into(),
            imap_host: "imap.gmail.com".into(),
            imap_port: 993,
            sasl: SaslMechanism::XOAuth2,
        };
        let req = CreateImporterRequest {
            product: ImportType::Mail,
            fields: &mail,
        };

        assert_eq!(
            serde_json::to_value(&req).unwrap(),
            json!({
                "Product": "Mail",
                "TokenID": "token-id",
                "ImapHost": "imap.gmail.com",
                "ImapPort": 993,
                "Sasl": "XOAUTH2",
            })
        );

        let req = CreateImporterRequest {
            product: ImportType::Contacts,
            fields: &TokenId {
                token_id: "token-id",
            },
        };

        assert_eq!(
            serde_json::to_value(&req).unwrap(),
            json!({ "Product": "Contacts", "TokenID": "token-id" })
        );
    }
}
