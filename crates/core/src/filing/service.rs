//! Filing service implementation.

use std::sync::Arc;

use tracing::{info, instrument, warn};
use vatdesk_shared::types::{DeclarationId, Nip};

use super::error::FilingError;
use crate::declaration::{Declaration, DeclarationBuilder};
use crate::invoice::{Invoice, InvoiceLedger};
use crate::lifecycle::{
    Confirmation, DeclarationMetadata, DeclarationStatus, DeclarationStore, LifecycleError,
    NewDeclarationRecord, StoreError, StoredDeclaration,
};
use crate::period::{Clock, PeriodKey, YearMonth};
use crate::vat::{CounterpartyDirectory, VatAggregator, VatError};
use crate::xml;

/// A declaration and its serialized form, not yet persisted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedDeclaration {
    /// The structured document.
    pub declaration: Declaration,
    /// The exact bytes of the file.
    pub content: Vec<u8>,
}

/// Orchestrates declaration generation and the record lifecycle.
pub struct FilingService<L: InvoiceLedger, S: DeclarationStore, C: Clock> {
    ledger: Arc<L>,
    store: Arc<S>,
    clock: C,
    builder: DeclarationBuilder,
}

impl<L: InvoiceLedger, S: DeclarationStore, C: Clock> FilingService<L, S, C> {
    /// Creates a new filing service.
    #[must_use]
    pub const fn new(ledger: Arc<L>, store: Arc<S>, clock: C, builder: DeclarationBuilder) -> Self {
        Self {
            ledger,
            store,
            clock,
            builder,
        }
    }

    /// Generates the declaration of `tenant` for `period`.
    ///
    /// The carry-forward comes from the most recently confirmed declaration
    /// of the previous month; drafts are ignored. Nothing is persisted.
    #[instrument(skip_all, fields(tenant = %tenant, period = %period))]
    pub async fn generate(
        &self,
        tenant: &Nip,
        period: YearMonth,
    ) -> Result<GeneratedDeclaration, FilingError> {
        let invoices = self.ledger.invoices_for_period(tenant, period).await?;
        let directory = self.resolve_counterparties(&invoices).await?;
        let previous = PeriodKey::new(tenant.clone(), period).previous();
        let carried_forward_in = self
            .store
            .confirmed_carry_forward(&previous)
            .await?
            .unwrap_or(0);

        let aggregation = VatAggregator::aggregate(&invoices, &directory, carried_forward_in)?;
        let declaration = self.builder.build(period, aggregation, self.clock.now());
        let content = xml::to_bytes(&declaration)?;

        info!(
            sales = declaration.ledger.sales.len(),
            purchases = declaration.ledger.purchases.len(),
            carried_forward_in,
            amount_due = declaration.amount_due(),
            carry_forward = declaration.carry_forward(),
            "Generated declaration"
        );

        Ok(GeneratedDeclaration {
            declaration,
            content,
        })
    }

    /// Generates the declaration for the month before the clock's current time.
    pub async fn generate_for_previous_month(
        &self,
        tenant: &Nip,
    ) -> Result<GeneratedDeclaration, FilingError> {
        let period = YearMonth::preceding(self.clock.now());
        self.generate(tenant, period).await
    }

    /// Stores a generated declaration as a draft.
    #[instrument(skip_all, fields(tenant = %tenant, period = %generated.declaration.period()))]
    pub async fn persist(
        &self,
        tenant: &Nip,
        generated: GeneratedDeclaration,
    ) -> Result<DeclarationId, FilingError> {
        let GeneratedDeclaration {
            declaration,
            content,
        } = generated;

        let id = self
            .store
            .insert(NewDeclarationRecord {
                tenant: tenant.clone(),
                period: declaration.period(),
                content,
                generated_at: declaration.generated_at(),
                amount_due: declaration.amount_due(),
                carry_forward: declaration.carry_forward(),
            })
            .await?;

        info!(declaration_id = %id, "Stored declaration draft");
        Ok(id)
    }

    /// Generates and stores in one step.
    pub async fn generate_and_persist(
        &self,
        tenant: &Nip,
        period: YearMonth,
    ) -> Result<(DeclarationId, GeneratedDeclaration), FilingError> {
        let generated = self.generate(tenant, period).await?;
        let id = self.persist(tenant, generated.clone()).await?;
        Ok((id, generated))
    }

    /// Confirms a draft with the tax authority's reference code.
    ///
    /// The code is validated before the store is touched. Confirming an
    /// already confirmed declaration fails with `NotFound` and leaves the
    /// first confirmation in place.
    #[instrument(skip_all, fields(tenant = %tenant, declaration_id = %id))]
    pub async fn confirm(
        &self,
        tenant: &Nip,
        id: DeclarationId,
        reference_code: &str,
    ) -> Result<Confirmation, FilingError> {
        let confirmation =
            Confirmation::new(reference_code, self.clock.now()).map_err(FilingError::Validation)?;

        if !self.store.confirm(tenant, id, &confirmation).await? {
            self.log_refusal(tenant, id, |status| status.confirm().map(|_| ())).await;
            return Err(FilingError::NotFound(id));
        }

        info!(reference_code = %confirmation.reference_code, "Confirmed declaration");
        Ok(confirmation)
    }

    /// Deletes a draft. Confirmed declarations are never deleted.
    #[instrument(skip_all, fields(tenant = %tenant, declaration_id = %id))]
    pub async fn delete(&self, tenant: &Nip, id: DeclarationId) -> Result<(), FilingError> {
        if !self.store.delete(tenant, id).await? {
            self.log_refusal(tenant, id, DeclarationStatus::delete).await;
            return Err(FilingError::NotFound(id));
        }

        info!("Deleted declaration draft");
        Ok(())
    }

    /// Fetches a declaration, parsed back from its stored file.
    pub async fn get(
        &self,
        tenant: &Nip,
        id: DeclarationId,
    ) -> Result<(Declaration, DeclarationMetadata), FilingError> {
        let stored = self.stored(tenant, id).await?;
        let declaration = xml::from_bytes(&stored.content)?;
        Ok((declaration, stored.metadata))
    }

    /// Metadata of all declarations of `tenant`, in insertion order.
    pub async fn list(&self, tenant: &Nip) -> Result<Vec<DeclarationMetadata>, FilingError> {
        Ok(self.store.list(tenant).await?)
    }

    /// The stored file bytes.
    pub async fn content(&self, tenant: &Nip, id: DeclarationId) -> Result<Vec<u8>, FilingError> {
        Ok(self.stored(tenant, id).await?.content)
    }

    /// The stored file with its download name.
    pub async fn download(
        &self,
        tenant: &Nip,
        id: DeclarationId,
    ) -> Result<(String, Vec<u8>), FilingError> {
        let stored = self.stored(tenant, id).await?;
        Ok((stored.metadata.file_name(), stored.content))
    }

    async fn stored(&self, tenant: &Nip, id: DeclarationId) -> Result<StoredDeclaration, FilingError> {
        let stored = self
            .store
            .find(tenant, id)
            .await?
            .ok_or(FilingError::NotFound(id))?;

        if stored.content.is_empty() {
            return Err(StoreError::Corrupt(format!("declaration {id} has no file content")).into());
        }
        Ok(stored)
    }

    /// Explains why the store matched no draft.
    ///
    /// Returns the rule the current record breaks, or `None` when the record
    /// is gone or was a draft at the time of the lookup.
    pub(crate) async fn refusal(
        &self,
        tenant: &Nip,
        id: DeclarationId,
        transition: fn(DeclarationStatus) -> Result<(), LifecycleError>,
    ) -> Result<Option<LifecycleError>, FilingError> {
        let Some(stored) = self.store.find(tenant, id).await? else {
            return Ok(None);
        };
        Ok(transition(stored.metadata.status()).err())
    }

    async fn log_refusal(
        &self,
        tenant: &Nip,
        id: DeclarationId,
        transition: fn(DeclarationStatus) -> Result<(), LifecycleError>,
    ) {
        match self.refusal(tenant, id, transition).await {
            Ok(Some(rule)) => warn!(code = rule.error_code(), "{rule}"),
            Ok(None) => warn!("No draft matched the request"),
            Err(e) => warn!(error = %e, "Could not look up the refused declaration"),
        }
    }

    async fn resolve_counterparties(
        &self,
        invoices: &[Invoice],
    ) -> Result<CounterpartyDirectory, FilingError> {
        let mut directory = CounterpartyDirectory::new();
        for invoice in invoices {
            let nip = &invoice.counterparty_nip;
            if directory.contains(nip) {
                continue;
            }
            let name = self
                .ledger
                .company_name(nip)
                .await?
                .ok_or_else(|| VatError::CounterpartyNotFound(nip.clone()))?;
            directory.insert(nip.clone(), name);
        }
        Ok(directory)
    }
}
