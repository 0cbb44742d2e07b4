//! The workflow engine.
//!
//! [`WorkflowEngine`] is the entry point for every request mutation. Each
//! operation validates input, loads state, authorizes the actor against the
//! [`PermissionTable`], and only then writes. Request writes are
//! compare-and-set on the version that was read, so a lost race surfaces as
//! [`WorkflowError::Conflict`] with nothing else written. Audit entries are
//! appended after the write; a failed append becomes a
//! [`WorkflowWarning`] on the returned [`WorkflowOutcome`].

use chrono::{DateTime, Utc};
use serde::Serialize;

use drawdown_config::WorkflowConfig;
use drawdown_core::audit_detail::{CreatedDetail, FieldsUpdatedDetail, TransitionDetail};
use drawdown_core::entities::{
    AuditEntry, NewAuditEntry, NewWithdrawalRequest, UserProfile, WithdrawalRequest,
};
use drawdown_core::enums::{Action, AuditAction, Decision, Stage};
use drawdown_core::store::{RequestFilter, WorkflowStore};
use drawdown_core::updates::{FieldsUpdate, RequestPatch};

use crate::assignment::{Assignment, AssignmentResolver};
use crate::audit::AuditLogger;
use crate::error::{WorkflowError, WorkflowWarning};
use crate::form::{WithdrawalForm, normalize_update};
use crate::notify::{NotificationContext, NotificationEvent, Notifier, TracingNotifier};
use crate::permissions::PermissionTable;
use crate::region;
use crate::status::{CREATED_STATUS, DRAFT_STATUS, compose_status};

/// Result of a committed workflow operation.
#[derive(Debug, Clone, Serialize)]
pub struct WorkflowOutcome {
    pub request: WithdrawalRequest,
    /// Set when the operation (re)assigned the request.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub assignment: Option<Assignment>,
    /// ID of the audit entry, absent if the append failed.
    pub audit_entry_id: Option<String>,
    /// Fields changed by an edit, in declaration order.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub changed_fields: Vec<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub warnings: Vec<WorkflowWarning>,
}

pub struct WorkflowEngine<S, N = TracingNotifier> {
    store: S,
    permissions: PermissionTable,
    resolver: AssignmentResolver,
    history_limit: u32,
    notifier: N,
}

impl<S: WorkflowStore> WorkflowEngine<S> {
    #[must_use]
    pub fn new(store: S, permissions: PermissionTable, config: &WorkflowConfig) -> Self {
        Self {
            store,
            permissions,
            resolver: AssignmentResolver::new(
                config.assignment_policy,
                config.allow_any_active_fallback,
            ),
            history_limit: config.history_limit,
            notifier: TracingNotifier,
        }
    }
}

impl<S: WorkflowStore, N: Notifier> WorkflowEngine<S, N> {
    /// Swap the notifier.
    #[must_use]
    pub fn with_notifier<M: Notifier>(self, notifier: M) -> WorkflowEngine<S, M> {
        WorkflowEngine {
            store: self.store,
            permissions: self.permissions,
            resolver: self.resolver,
            history_limit: self.history_limit,
            notifier,
        }
    }

    #[must_use]
    pub const fn store(&self) -> &S {
        &self.store
    }

    #[must_use]
    pub const fn permissions(&self) -> &PermissionTable {
        &self.permissions
    }

    #[must_use]
    pub const fn notifier(&self) -> &N {
        &self.notifier
    }

    // -----------------------------------------------------------------------
    // Creation
    // -----------------------------------------------------------------------

    /// Open a request directly into loan review.
    ///
    /// # Errors
    ///
    /// `Validation` for a malformed form, `UnsupportedCountry`, `Unauthorized`
    /// unless the creator may create, `AssignmentFailure` if nobody can take
    /// loan review, or `Store`. Nothing is persisted on error.
    pub async fn create_request(
        &self,
        form: &WithdrawalForm,
        creator_id: &str,
    ) -> Result<WorkflowOutcome, WorkflowError> {
        self.open(form, creator_id, Stage::UnderLoanReview, CREATED_STATUS)
            .await
    }

    /// Open a request as a draft, assigned to the archive team until an
    /// archive team member submits it with an `approve`.
    ///
    /// # Errors
    ///
    /// Same as [`Self::create_request`].
    pub async fn create_draft(
        &self,
        form: &WithdrawalForm,
        creator_id: &str,
    ) -> Result<WorkflowOutcome, WorkflowError> {
        self.open(form, creator_id, Stage::Submitted, DRAFT_STATUS)
            .await
    }

    async fn open(
        &self,
        form: &WithdrawalForm,
        creator_id: &str,
        stage: Stage,
        status: &str,
    ) -> Result<WorkflowOutcome, WorkflowError> {
        let form = form.normalized()?;
        let (country, region) = region::canonical_country(&form.country)
            .and_then(|c| region::region_for(c).map(|r| (c, r)))
            .ok_or_else(|| WorkflowError::UnsupportedCountry {
                country: form.country.clone(),
            })?;

        let actor = self.load_actor(creator_id).await?;
        self.authorize(&actor, Action::Create, Some(stage))?;

        let assignment = self
            .resolver
            .assignee_for(&self.store, stage, region)
            .await?
            .ok_or(WorkflowError::AssignmentFailure { stage, region })?;

        let request = self
            .store
            .create_request(&NewWithdrawalRequest {
                project_number: form.project_number,
                reference_number: form.reference_number,
                country: country.to_string(),
                beneficiary_name: form.beneficiary_name,
                amount: form.amount,
                currency: form.currency,
                region,
                current_stage: stage,
                status: status.to_string(),
                assigned_to: Some(assignment.user_id.clone()),
                created_by: actor.id.clone(),
            })
            .await?;

        let mut warnings = Vec::new();
        self.stamp_assignment(&assignment, &mut warnings).await;

        let detail = CreatedDetail {
            country: request.country.clone(),
            region,
            draft: stage == Stage::Submitted,
            assignment: assignment.detail(region),
        };
        let entry = NewAuditEntry {
            request_id: request.id.clone(),
            actor_user_id: actor.id.clone(),
            action: AuditAction::Created,
            previous_stage: None,
            new_stage: Some(stage),
            previous_status: None,
            new_status: Some(request.status.clone()),
            amount_involved: Some(request.amount),
            comments: None,
            metadata: metadata(&detail),
            created_at: request.created_at,
        };
        let audit_entry_id = self.write_audit(&entry, &mut warnings).await;

        tracing::info!(
            request_id = %request.id,
            %region,
            %stage,
            creator = %actor.id,
            assignee = %assignment.user_id,
            "request created"
        );
        self.notifier.notify(
            NotificationEvent::Assigned,
            &assignment.user_id,
            &notification_context(&request),
        );

        Ok(WorkflowOutcome {
            request,
            assignment: Some(assignment),
            audit_entry_id,
            changed_fields: Vec::new(),
            warnings,
        })
    }

    // -----------------------------------------------------------------------
    // Transitions
    // -----------------------------------------------------------------------

    /// Apply a reviewer decision to a request.
    ///
    /// # Errors
    ///
    /// `Validation` for a reject without comments, `NotFound`, `Unauthorized`,
    /// `InvalidTransition` from the terminal stage, `AssignmentFailure`
    /// (nothing persisted), `Conflict` if the request moved on since it was
    /// read, or `Store`.
    pub async fn transition(
        &self,
        request_id: &str,
        decision: Decision,
        comments: Option<&str>,
        actor_id: &str,
    ) -> Result<WorkflowOutcome, WorkflowError> {
        let comments = clean(comments);
        if decision == Decision::Reject && comments.is_none() {
            return Err(WorkflowError::validation("a rejection requires comments"));
        }

        let request = self.store.get_request(request_id).await?;
        let actor = self.load_actor(actor_id).await?;
        let from = request.current_stage;
        self.authorize(&actor, Action::for_decision(decision, from), Some(from))?;

        let to = from
            .next(decision)
            .ok_or_else(|| WorkflowError::InvalidTransition {
                id: request.id.clone(),
                stage: from,
            })?;
        debug_assert!(from.can_transition_to(to), "{from} -> {to} is not a stage edge");

        let assignment = if to.is_terminal() {
            None
        } else {
            let found = self
                .resolver
                .assignee_for(&self.store, to, request.region)
                .await?;
            Some(found.ok_or(WorkflowError::AssignmentFailure {
                stage: to,
                region: request.region,
            })?)
        };

        let status = compose_status(decision, from, to, comments.as_deref(), request.region);
        let now = Utc::now();
        let patch = transition_patch(TransitionInput {
            decision,
            from,
            to,
            status: &status,
            assignment: assignment.as_ref(),
            actor_id: &actor.id,
            comments: comments.as_deref(),
            now,
        });
        let updated = self.persist(&request, &patch).await?;

        let mut warnings = Vec::new();
        if let Some(ref assignment) = assignment {
            self.stamp_assignment(assignment, &mut warnings).await;
        }

        let detail = TransitionDetail {
            decision,
            actor_role: actor.role,
            assignment: assignment.as_ref().map(|a| a.detail(updated.region)),
            version: updated.version,
        };
        let entry = NewAuditEntry {
            request_id: updated.id.clone(),
            actor_user_id: actor.id.clone(),
            action: AuditAction::for_transition(decision, from),
            previous_stage: Some(from),
            new_stage: Some(to),
            previous_status: Some(request.status.clone()),
            new_status: Some(updated.status.clone()),
            amount_involved: Some(updated.amount),
            comments: comments.clone(),
            metadata: metadata(&detail),
            created_at: now,
        };
        let audit_entry_id = self.write_audit(&entry, &mut warnings).await;

        tracing::info!(
            request_id = %updated.id,
            %decision,
            %from,
            %to,
            actor = %actor.id,
            assignee = updated.assigned_to.as_deref().unwrap_or("-"),
            "transition committed"
        );
        self.notify_transition(&updated, decision, from, assignment.as_ref());

        Ok(WorkflowOutcome {
            request: updated,
            assignment,
            audit_entry_id,
            changed_fields: Vec::new(),
            warnings,
        })
    }

    // -----------------------------------------------------------------------
    // Edits and comments
    // -----------------------------------------------------------------------

    /// Change identity fields of a request without moving it.
    ///
    /// Only fields that differ from the stored values are written; the audit
    /// entry records their names with before and after values.
    ///
    /// # Errors
    ///
    /// `Validation` if the update is empty, invalid, or changes nothing;
    /// `NotFound`; `Unauthorized`; `InvalidTransition` on a disbursed request;
    /// `Conflict`; `Store`.
    pub async fn update_fields(
        &self,
        request_id: &str,
        update: &FieldsUpdate,
        actor_id: &str,
    ) -> Result<WorkflowOutcome, WorkflowError> {
        let update = normalize_update(update)?;
        let request = self.store.get_request(request_id).await?;
        let actor = self.load_actor(actor_id).await?;
        let stage = request.current_stage;
        self.authorize(&actor, Action::Edit, Some(stage))?;
        if stage.is_terminal() {
            return Err(WorkflowError::InvalidTransition {
                id: request.id.clone(),
                stage,
            });
        }

        let changed = changed_only(&request, update);
        if changed.is_empty() {
            return Err(WorkflowError::validation(
                "update does not change any field",
            ));
        }
        let fields: Vec<String> = changed
            .field_names()
            .into_iter()
            .map(String::from)
            .collect();
        let detail = FieldsUpdatedDetail {
            before: snapshot(&request, &fields),
            after: serde_json::to_value(&changed).unwrap_or_default(),
            fields: fields.clone(),
        };

        let now = Utc::now();
        let updated = self.persist(&request, &RequestPatch::from(changed)).await?;

        let mut warnings = Vec::new();
        let entry = NewAuditEntry {
            request_id: updated.id.clone(),
            actor_user_id: actor.id.clone(),
            action: AuditAction::Updated,
            previous_stage: Some(stage),
            new_stage: Some(stage),
            previous_status: Some(request.status.clone()),
            new_status: Some(updated.status.clone()),
            amount_involved: Some(updated.amount),
            comments: Some(format!("Updated {}", fields.join(", "))),
            metadata: metadata(&detail),
            created_at: now,
        };
        let audit_entry_id = self.write_audit(&entry, &mut warnings).await;

        tracing::info!(
            request_id = %updated.id,
            fields = %fields.join(","),
            actor = %actor.id,
            "request fields updated"
        );

        Ok(WorkflowOutcome {
            request: updated,
            assignment: None,
            audit_entry_id,
            changed_fields: fields,
            warnings,
        })
    }

    /// Edit then approve, as two audited steps.
    ///
    /// Both the edit and the approval are authorized before anything is
    /// written. The changed field names are folded into the approval comment.
    /// An update that changes nothing skips the edit step.
    ///
    /// # Errors
    ///
    /// Any error from [`Self::update_fields`] or [`Self::transition`]. If the
    /// approval fails after the edit committed, the edit stays.
    pub async fn modify_and_approve(
        &self,
        request_id: &str,
        update: &FieldsUpdate,
        comments: Option<&str>,
        actor_id: &str,
    ) -> Result<WorkflowOutcome, WorkflowError> {
        let request = self.store.get_request(request_id).await?;
        let actor = self.load_actor(actor_id).await?;
        let stage = request.current_stage;
        let edits = !update.is_empty()
            && !changed_only(&request, normalize_update(update)?).is_empty();
        if edits {
            self.authorize(&actor, Action::Edit, Some(stage))?;
        }
        self.authorize(
            &actor,
            Action::for_decision(Decision::Approve, stage),
            Some(stage),
        )?;
        if stage.is_terminal() {
            return Err(WorkflowError::InvalidTransition {
                id: request.id,
                stage,
            });
        }

        let comments = clean(comments);
        let (approval_comment, changed_fields, mut warnings) = if !edits {
            (comments, Vec::new(), Vec::new())
        } else {
            let edit = self.update_fields(request_id, update, actor_id).await?;
            let list = edit.changed_fields.join(", ");
            let folded = match comments {
                Some(c) => format!("{c} (modified: {list})"),
                None => format!("Modified: {list}"),
            };
            (Some(folded), edit.changed_fields, edit.warnings)
        };

        let mut outcome = self
            .transition(
                request_id,
                Decision::Approve,
                approval_comment.as_deref(),
                actor_id,
            )
            .await?;
        warnings.append(&mut outcome.warnings);
        outcome.warnings = warnings;
        outcome.changed_fields = changed_fields;
        Ok(outcome)
    }

    /// Attach a comment to a request's audit trail without changing it.
    ///
    /// # Errors
    ///
    /// `Validation` for a blank comment, `NotFound`, `Unauthorized`, `Store`.
    pub async fn add_comment(
        &self,
        request_id: &str,
        comments: &str,
        actor_id: &str,
    ) -> Result<WorkflowOutcome, WorkflowError> {
        let comments = clean(Some(comments))
            .ok_or_else(|| WorkflowError::validation("comment must not be empty"))?;
        let request = self.store.get_request(request_id).await?;
        let actor = self.load_actor(actor_id).await?;
        let stage = request.current_stage;
        self.authorize(&actor, Action::Comment, Some(stage))?;

        let mut warnings = Vec::new();
        let entry = NewAuditEntry {
            request_id: request.id.clone(),
            actor_user_id: actor.id.clone(),
            action: AuditAction::Commented,
            previous_stage: Some(stage),
            new_stage: Some(stage),
            previous_status: Some(request.status.clone()),
            new_status: Some(request.status.clone()),
            amount_involved: None,
            comments: Some(comments),
            metadata: None,
            created_at: Utc::now(),
        };
        let audit_entry_id = self.write_audit(&entry, &mut warnings).await;

        Ok(WorkflowOutcome {
            request,
            assignment: None,
            audit_entry_id,
            changed_fields: Vec::new(),
            warnings,
        })
    }

    // -----------------------------------------------------------------------
    // Reads
    // -----------------------------------------------------------------------

    /// # Errors
    ///
    /// `NotFound` or `Store`.
    pub async fn get_request(&self, request_id: &str) -> Result<WithdrawalRequest, WorkflowError> {
        Ok(self.store.get_request(request_id).await?)
    }

    /// Audit history of a request, newest first. `None` uses the configured
    /// history limit.
    ///
    /// # Errors
    ///
    /// `NotFound` or `Store`.
    pub async fn history(
        &self,
        request_id: &str,
        limit: Option<u32>,
    ) -> Result<Vec<AuditEntry>, WorkflowError> {
        let request = self.store.get_request(request_id).await?;
        let limit = limit.unwrap_or(self.history_limit);
        Ok(AuditLogger::new(&self.store)
            .history(&request.id, limit)
            .await?)
    }

    /// Requests currently assigned to `user_id`, newest first.
    ///
    /// # Errors
    ///
    /// `Store`.
    pub async fn assigned_to(
        &self,
        user_id: &str,
        limit: Option<u32>,
    ) -> Result<Vec<WithdrawalRequest>, WorkflowError> {
        self.list(&RequestFilter {
            assigned_to: Some(user_id.to_string()),
            limit,
            ..RequestFilter::default()
        })
        .await
    }

    /// # Errors
    ///
    /// `Store`.
    pub async fn list(
        &self,
        filter: &RequestFilter,
    ) -> Result<Vec<WithdrawalRequest>, WorkflowError> {
        Ok(self.store.list_requests(filter).await?)
    }

    // -----------------------------------------------------------------------
    // Internals
    // -----------------------------------------------------------------------

    /// Fetch the acting user. Unknown and inactive users are unauthorized.
    async fn load_actor(&self, actor_id: &str) -> Result<UserProfile, WorkflowError> {
        match self.store.get_user(actor_id).await {
            Ok(user) if user.is_active => Ok(user),
            Ok(_) => Err(WorkflowError::unauthorized(actor_id, "user is inactive")),
            Err(e) if e.is_not_found() => {
                Err(WorkflowError::unauthorized(actor_id, "unknown user"))
            }
            Err(e) => Err(WorkflowError::Store(e)),
        }
    }

    fn authorize(
        &self,
        actor: &UserProfile,
        action: Action,
        stage: Option<Stage>,
    ) -> Result<(), WorkflowError> {
        if self.permissions.can_perform_action(actor.role, action, stage) {
            return Ok(());
        }
        let at = stage.map_or_else(String::new, |s| format!(" at {s}"));
        tracing::debug!(actor = %actor.id, role = %actor.role, %action, ?stage, "denied");
        Err(WorkflowError::unauthorized(
            &actor.id,
            format!("role {} may not {action}{at}", actor.role),
        ))
    }

    async fn persist(
        &self,
        request: &WithdrawalRequest,
        patch: &RequestPatch,
    ) -> Result<WithdrawalRequest, WorkflowError> {
        self.store
            .update_request(&request.id, request.version, patch)
            .await
            .map_err(|e| {
                let err = WorkflowError::from(e);
                if matches!(err, WorkflowError::Conflict { .. }) {
                    tracing::warn!(
                        request_id = %request.id,
                        version = request.version,
                        "request changed underneath this update"
                    );
                }
                err
            })
    }

    async fn stamp_assignment(&self, assignment: &Assignment, warnings: &mut Vec<WorkflowWarning>) {
        if let Err(e) = self
            .store
            .record_assignment(&assignment.user_id, Utc::now())
            .await
        {
            tracing::warn!(user_id = %assignment.user_id, error = %e, "assignment stamp failed");
            warnings.push(WorkflowWarning::AssignmentNotRecorded {
                user_id: assignment.user_id.clone(),
                reason: e.to_string(),
            });
        }
    }

    async fn write_audit(
        &self,
        entry: &NewAuditEntry,
        warnings: &mut Vec<WorkflowWarning>,
    ) -> Option<String> {
        match AuditLogger::new(&self.store).try_append(entry).await {
            Ok(stored) => Some(stored.id),
            Err(e) => {
                warnings.push(WorkflowWarning::AuditWriteFailure {
                    request_id: entry.request_id.clone(),
                    action: entry.action.to_string(),
                    reason: e.to_string(),
                });
                None
            }
        }
    }

    fn notify_transition(
        &self,
        request: &WithdrawalRequest,
        decision: Decision,
        from: Stage,
        assignment: Option<&Assignment>,
    ) {
        let context = notification_context(request);
        match assignment {
            Some(a) => {
                let event = match decision {
                    Decision::Approve => NotificationEvent::Assigned,
                    Decision::Reject if request.current_stage == from => NotificationEvent::Rejected,
                    Decision::Reject => NotificationEvent::Returned,
                };
                self.notifier.notify(event, &a.user_id, &context);
            }
            None => {
                self.notifier
                    .notify(NotificationEvent::Disbursed, &request.created_by, &context);
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Pure helpers
// ---------------------------------------------------------------------------

/// Trim comments; blank becomes `None`.
fn clean(comments: Option<&str>) -> Option<String> {
    comments
        .map(str::trim)
        .filter(|c| !c.is_empty())
        .map(String::from)
}

fn metadata<T: Serialize>(detail: &T) -> Option<serde_json::Value> {
    serde_json::to_value(detail).ok()
}

fn notification_context(request: &WithdrawalRequest) -> NotificationContext {
    NotificationContext {
        request_id: request.id.clone(),
        reference_number: request.reference_number.clone(),
        stage: request.current_stage,
        region: request.region,
        status: request.status.clone(),
    }
}

struct TransitionInput<'a> {
    decision: Decision,
    from: Stage,
    to: Stage,
    status: &'a str,
    assignment: Option<&'a Assignment>,
    actor_id: &'a str,
    comments: Option<&'a str>,
    now: DateTime<Utc>,
}

/// Build the store patch for a transition.
///
/// Reviewer fields are written for the stage being left, and only when the
/// request actually moves.
fn transition_patch(input: TransitionInput<'_>) -> RequestPatch {
    let TransitionInput {
        decision,
        from,
        to,
        status,
        assignment,
        actor_id,
        comments,
        now,
    } = input;

    let mut patch = RequestPatch {
        current_stage: Some(to),
        status: Some(status.to_string()),
        assigned_to: Some(assignment.map(|a| a.user_id.clone())),
        rejection_reason: Some(match decision {
            Decision::Reject => comments.map(String::from),
            Decision::Approve => None,
        }),
        ..RequestPatch::default()
    };

    if to != from {
        match from {
            Stage::UnderLoanReview | Stage::ReturnedForModification => {
                patch.loan_admin_reviewed_by = Some(actor_id.to_string());
                patch.loan_admin_reviewed_at = Some(now);
                patch.loan_admin_comments = Some(comments.map(String::from));
            }
            Stage::UnderOperationsReview => {
                patch.regional_ops_reviewed_by = Some(actor_id.to_string());
                patch.regional_ops_reviewed_at = Some(now);
                patch.regional_ops_comments = Some(comments.map(String::from));
            }
            Stage::Approved => {
                patch.core_banking_processed_by = Some(actor_id.to_string());
                patch.core_banking_processed_at = Some(now);
            }
            Stage::Submitted | Stage::Disbursed => {}
        }
    }
    if to == Stage::Disbursed {
        patch.completed_at = Some(now);
    }
    patch
}

/// Drop fields of `update` that already hold the requested value.
fn changed_only(request: &WithdrawalRequest, update: FieldsUpdate) -> FieldsUpdate {
    FieldsUpdate {
        project_number: update
            .project_number
            .filter(|v| *v != request.project_number),
        reference_number: update
            .reference_number
            .filter(|v| *v != request.reference_number),
        beneficiary_name: update
            .beneficiary_name
            .filter(|v| *v != request.beneficiary_name),
        amount: update.amount.filter(|v| *v != request.amount),
        currency: update.currency.filter(|v| *v != request.currency),
    }
}

/// Current values of `fields` as a JSON object.
fn snapshot(request: &WithdrawalRequest, fields: &[String]) -> serde_json::Value {
    let current = serde_json::to_value(request).unwrap_or_default();
    let picked: serde_json::Map<String, serde_json::Value> = fields
        .iter()
        .filter_map(|f| current.get(f).map(|v| (f.clone(), v.clone())))
        .collect();
    serde_json::Value::Object(picked)
}
