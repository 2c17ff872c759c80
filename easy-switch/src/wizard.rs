//! # Wizard
//!
//! The import assistant itself: a three-step wizard going from the
//! consent screen to the start of the import task.
//!
//! ```text
//! Authentication --(consent + importers)--> SelectImportType --(launch)--> Success
//! ```
//!
//! Any failure keeps the wizard at its current step, so that the user
//! can retry from there.

use chrono::Utc;
use futures::{stream::FuturesUnordered, StreamExt};
use tracing::{debug, trace, warn};

use crate::{
    api::{CreateMailImporterRequest, CreateTokenRequest, ImportApi, SaslMechanism},
    calendar::{
        provision::resolve_mapping, CalendarImportMapping, CalendarImporterPayload,
        CalendarProvisioner,
    },
    consent::{requested_scope, OAuthProps},
    contacts::ContactsImporterPayload,
    context::ImportContext,
    keys::Address,
    mail::{
        mapping::{default_import_label, default_mapping},
        MailImporterPayload, TimePeriod,
    },
    model::{
        CreatedImporter, ImportData, ImportModel, ImportStep, LaunchImportPayload, LoadingState,
    },
    provider::{OAuthProvider, DEFAULT_IMAP_PORT},
    summary,
    validation::{calendar_errors, mail_mapping_errors, PayloadError},
    CheckedProducts, Error, ImportType, Result,
};

/// The import assistant.
pub struct ImportAssistant {
    ctx: ImportContext,
    addresses: Vec<Address>,
    provider: OAuthProvider,
    imap_port: u16,
    existing_calendars_count: usize,
    checked: CheckedProducts,
    model: ImportModel,
    loading: LoadingState,
}

impl ImportAssistant {
    /// Opens the import assistant for the given addresses. Messages
    /// are imported to the first one.
    pub fn new(
        ctx: ImportContext,
        addresses: Vec<Address>,
        default_checked: impl IntoIterator<Item = ImportType>,
    ) -> Result<Self> {
        let address_id = match addresses.first() {
            Some(address) => address.id.clone(),
            None => return Err(ctx.surface(Error::NoAddressError)),
        };

        let checked = CheckedProducts::from_defaults(default_checked);
        debug!(address_id, ?checked, "opening import assistant");

        Ok(Self {
            ctx,
            addresses,
            provider: OAuthProvider::default(),
            imap_port: DEFAULT_IMAP_PORT,
            existing_calendars_count: 0,
            checked,
            model: ImportModel::new(address_id),
            loading: LoadingState::default(),
        })
    }

    pub fn with_provider(mut self, provider: OAuthProvider) -> Self {
        self.provider = provider;
        self
    }

    pub fn with_imap_port(mut self, port: u16) -> Self {
        self.imap_port = port;
        self
    }

    /// Sets the number of calendars the user already owns, used to
    /// enforce the calendars limit.
    pub fn with_existing_calendars_count(mut self, count: usize) -> Self {
        self.existing_calendars_count = count;
        self.refresh_payload_validity();
        self
    }

    pub fn model(&self) -> &ImportModel {
        &self.model
    }

    pub fn step(&self) -> ImportStep {
        self.model.step
    }

    pub fn loading(&self) -> LoadingState {
        self.loading
    }

    pub fn checked_products(&self) -> CheckedProducts {
        self.checked
    }

    pub fn selected_products(&self) -> Vec<ImportType> {
        self.checked.selected()
    }

    /// Whether the given product can still be toggled. Once the
    /// consent is given, only granted products whose importer exists
    /// can.
    pub fn is_product_enabled(&self, kind: ImportType) -> bool {
        if self.model.oauth_props.is_none() {
            return true;
        }

        self.model.token_scope.contains(&kind) && !self.model.data.importer_id(kind).is_empty()
    }

    pub fn toggle_product(&mut self, kind: ImportType) {
        if !self.is_product_enabled(kind) {
            trace!(%kind, "product not granted, ignoring toggle");
            return;
        }

        self.checked.toggle(kind);
        self.refresh_payload_validity();
    }

    /// The scope requested on the consent screen.
    pub fn requested_scope(&self) -> String {
        requested_scope(self.provider, &self.checked)
    }

    /// Replaces the mail payload with the one customized by the user.
    pub fn update_mail_payload(&mut self, period: TimePeriod, mut payload: MailImporterPayload) {
        if let Some(initial) = &self.model.initial_payload.mail {
            payload.custom_fields = payload.custom_fields(initial, period);
        }

        trace!(?period, custom_fields = payload.custom_fields, "updating mail payload");

        let mut model = self.model.clone();
        model.data.mail.selected_period = period;
        model.payload.mail = Some(payload);
        self.model = model;
        self.refresh_payload_validity();
    }

    /// Replaces the calendar mapping with the one customized by the
    /// user.
    pub fn update_calendar_mapping(&mut self, mapping: Vec<CalendarImportMapping>) {
        trace!(count = mapping.len(), "updating calendar mapping");

        let mut model = self.model.clone();
        model.payload.calendar = Some(CalendarImporterPayload { mapping });
        self.model = model;
        self.refresh_payload_validity();
    }

    /// Validates the payload of checked products.
    pub fn payload_errors(&self) -> Vec<PayloadError> {
        let mut errors = Vec::new();

        if self.checked.mail {
            if let Some(mail) = &self.model.payload.mail {
                errors.extend(mail_mapping_errors(&mail.mapping));
            }
        }

        if self.checked.calendar {
            if let Some(calendar) = &self.model.payload.calendar {
                errors.extend(calendar_errors(
                    &calendar.mapping,
                    self.existing_calendars_count,
                ));
            }
        }

        errors
    }

    fn refresh_payload_validity(&mut self) {
        let invalid = !self.payload_errors().is_empty();

        if invalid != self.model.is_payload_invalid {
            debug!(invalid, "payload validity changed");
            self.model.is_payload_invalid = invalid;
        }
    }

    /// Whether [`Self::submit`] can be called.
    pub fn can_submit(&self) -> bool {
        if self.loading.is_loading() || self.model.step == ImportStep::Success {
            return false;
        }

        if self.checked.is_empty() {
            return false;
        }

        self.model.oauth_props.is_none() || !self.model.is_payload_invalid
    }

    pub fn mail_summary(&self) -> Option<String> {
        let payload = self.model.payload.mail.as_ref()?;
        Some(summary::mail_summary(&self.model.data.mail, payload))
    }

    pub fn calendar_summary(&self) -> Option<String> {
        let payload = self.model.payload.calendar.as_ref()?;
        Some(summary::calendar_summary(&self.model.data.calendar, payload))
    }

    pub fn contacts_summary(&self) -> Option<String> {
        self.model.payload.contacts.as_ref()?;
        Some(summary::contacts_summary(&self.model.data.contacts))
    }

    /// Moves the wizard forward from its current step.
    pub async fn submit(&mut self) -> Result<()> {
        if self.checked.is_empty() {
            return Err(self.ctx.surface(Error::NoProductSelectedError));
        }

        match self.model.step {
            ImportStep::Authentication => self.authenticate().await,
            ImportStep::SelectImportType => self.launch().await,
            ImportStep::Success => Ok(()),
        }
    }

    /// Shows the consent screen, then creates the import token and
    /// one importer per granted product.
    ///
    /// A cancelled consent is not an error: the wizard stays where it
    /// is.
    pub async fn authenticate(&mut self) -> Result<()> {
        let scope = self.requested_scope();

        let props = match self.ctx.popup.authorize(self.provider, &scope).await {
            Ok(Some(props)) => props,
            Ok(None) => {
                debug!("consent cancelled, staying at authentication");
                return Ok(());
            }
            Err(err) => return Err(self.ctx.surface(err)),
        };

        self.loading.oauth = true;
        let res = self.provision(props).await;
        self.loading.oauth = false;

        res.map_err(|err| self.ctx.surface(err))
    }

    async fn provision(&mut self, props: OAuthProps) -> Result<()> {
        let req = CreateTokenRequest {
            provider: props.provider,
            code: props.code.clone(),
            redirect_uri: props.redirect_uri.clone(),
        };

        let token = self
            .ctx
            .api
            .create_token(&req)
            .await
            .map_err(Error::CreateTokenError)?;

        debug!(account = token.account, products = ?token.products, "import token created");

        if token.products.is_empty() {
            return Err(Error::EmptyTokenScopeError(token.account));
        }

        let api = self.ctx.api.clone();
        let mail_req = CreateMailImporterRequest {
            token_id: token.id.clone(),
            imap_host: props.provider.imap_host().to_owned(),
            imap_port: self.imap_port,
            sasl: SaslMechanism::XOAuth2,
        };

        let results: Vec<Result<CreatedImporter>> = FuturesUnordered::from_iter(
            token
                .products
                .iter()
                .map(|kind| create_importer(api.as_ref(), *kind, &token.id, &mail_req)),
        )
        .collect()
        .await;

        let mut data = self.model.data.clone();
        let mut first_err = None;
        let mut created = 0;

        for res in results {
            match res {
                Ok(importer) => {
                    debug!(kind = %importer.kind(), "importer created");
                    data.apply(importer);
                    created += 1;
                }
                Err(err) => {
                    warn!(?err, "skipping failed importer");
                    first_err.get_or_insert(err);
                }
            }
        }

        if created == 0 {
            return Err(first_err.unwrap_or_else(|| Error::NoImporterCreatedError(token.account)));
        }

        for kind in ImportType::ALL {
            if !token.products.contains(&kind) || data.importer_id(kind).is_empty() {
                self.checked.set(kind, false);
            }
        }

        let payload = self.default_payload(&data, &token.account);

        self.model = ImportModel {
            step: ImportStep::SelectImportType,
            imported_email: token.account,
            data,
            initial_payload: payload.clone(),
            payload,
            oauth_props: Some(props),
            token_scope: token.products,
            ..self.model.clone()
        };

        self.refresh_payload_validity();
        Ok(())
    }

    /// Builds the payload the user starts customizing from.
    fn default_payload(&self, data: &ImportData, imported_email: &str) -> LaunchImportPayload {
        let importer_id = ImportType::ALL
            .into_iter()
            .map(|kind| data.importer_id(kind))
            .find(|id| !id.is_empty())
            .unwrap_or_default()
            .to_owned();

        let mail = (!data.mail.importer_id.is_empty()).then(|| MailImporterPayload {
            address_id: self.model.address_id.clone(),
            mapping: default_mapping(&data.mail.provider_folders),
            import_label: Some(default_import_label(imported_email, Utc::now())),
            start_time: None,
            custom_fields: 0,
        });

        let calendar = (!data.calendar.importer_id.is_empty()).then(|| {
            CalendarImporterPayload::from_provider_calendars(&data.calendar.provider_calendars)
        });

        let contacts =
            (!data.contacts.importer_id.is_empty()).then(ContactsImporterPayload::default);

        LaunchImportPayload {
            importer_id,
            mail,
            calendar,
            contacts,
        }
    }

    /// Creates the calendars the mapping refers to by name, then
    /// starts the import task for checked products.
    ///
    /// If the import task cannot be started, calendars created by
    /// this call are removed.
    pub async fn launch(&mut self) -> Result<()> {
        if self.checked.is_empty() {
            return Err(self.ctx.surface(Error::NoProductSelectedError));
        }

        let errors = self.payload_errors();
        if !errors.is_empty() {
            return Err(self.ctx.surface(Error::InvalidPayloadError(errors)));
        }

        let has_payload = ImportType::ALL
            .into_iter()
            .any(|kind| self.checked.is_checked(kind) && self.model.payload.has(kind));

        if !has_payload {
            return Err(self.ctx.surface(Error::NoProductSelectedError));
        }

        let provisioner = CalendarProvisioner::new(self.ctx.api.clone(), self.ctx.keys.clone());
        let mut calendar = self.model.payload.calendar.clone().filter(|_| self.checked.calendar);
        let mut created_ids = Vec::new();

        if let Some(calendar) = calendar.as_mut() {
            let to_be_created = calendar.to_be_created().len();

            if to_be_created > 0 {
                self.loading.create_calendars = true;
                self.loading.calendars_to_be_created = to_be_created;
                self.loading.created_calendars = 0;

                let res = provisioner
                    .create_calendars(&self.addresses, &calendar.mapping)
                    .await;

                self.loading.create_calendars = false;
                let created = res.map_err(|err| self.ctx.surface(err))?;

                self.loading.created_calendars = created.len();
                created_ids = created
                    .iter()
                    .map(|entry| entry.destination.to_string())
                    .collect();

                self.ctx.refresh_events().await;
                calendar.mapping = resolve_mapping(&calendar.mapping, &created);
            }
        }

        let period = self.model.data.mail.selected_period;
        let payload = LaunchImportPayload {
            importer_id: self.model.payload.importer_id.clone(),
            mail: self
                .model
                .payload
                .mail
                .clone()
                .filter(|_| self.checked.mail)
                .map(|mail| mail.into_submission(period, Utc::now())),
            calendar,
            contacts: self
                .model
                .payload
                .contacts
                .clone()
                .filter(|_| self.checked.contacts),
        };

        debug!(importer_id = payload.importer_id, "starting import task");

        self.loading.start_import_task = true;
        let res = self.ctx.api.start_import_task(&payload).await;
        self.loading.start_import_task = false;

        match res {
            Ok(()) => {
                self.ctx.refresh_events().await;
                self.model = ImportModel {
                    step: ImportStep::Success,
                    ..self.model.clone()
                };
                Ok(())
            }
            Err(err) => {
                if !created_ids.is_empty() {
                    provisioner.remove_calendars(&created_ids).await;
                    self.ctx.refresh_events().await;
                }

                Err(self.ctx.surface(Error::StartImportTaskError(err)))
            }
        }
    }

    /// Closes the import assistant. Resources already created on the
    /// backend are kept.
    pub fn close(self) {
        debug!(step = ?self.model.step, "closing import assistant");
    }
}

async fn create_importer(
    api: &dyn ImportApi,
    kind: ImportType,
    token_id: &str,
    mail_req: &CreateMailImporterRequest,
) -> Result<CreatedImporter> {
    let importer = match kind {
        ImportType::Mail => api
            .create_mail_importer(mail_req)
            .await
            .map(CreatedImporter::Mail),
        ImportType::Calendar => api
            .create_calendar_importer(token_id)
            .await
            .map(CreatedImporter::Calendar),
        ImportType::Contacts => api
            .create_contacts_importer(token_id)
            .await
            .map(CreatedImporter::Contacts),
    };

    importer.map_err(|err| Error::CreateImporterError(err, kind))
}
