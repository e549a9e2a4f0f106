#![forbid(unsafe_code)]

//! In-memory forms service.
//!
//! A self-contained implementation of both API seams, used by tests and by
//! headless embeddings that want the full save/load/submit flow without a
//! network. Records live behind a mutex so the service can be shared.

use std::collections::HashMap;
use std::sync::Mutex;

use uuid::Uuid;

use crate::api::{
    ApiError, ApiResult, FormId, FormRecord, FormResponsesApi, FormSummary, FormsApi, NewForm,
    ResponseRecord, ResponseSubmission,
};

#[derive(Debug, Default)]
struct ServiceState {
    forms: Vec<FormRecord>,
    responses: HashMap<FormId, Vec<ResponseRecord>>,
}

/// In-memory forms + responses service.
#[derive(Debug, Default)]
pub struct InMemoryForms {
    state: Mutex<ServiceState>,
}

impl InMemoryForms {
    /// Create an empty service.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> ApiResult<std::sync::MutexGuard<'_, ServiceState>> {
        self.state
            .lock()
            .map_err(|_| ApiError::Connect("service state poisoned".into()))
    }
}

impl FormsApi for InMemoryForms {
    fn list(&self) -> ApiResult<Vec<FormSummary>> {
        let state = self.lock()?;
        Ok(state
            .forms
            .iter()
            .map(|record| FormSummary {
                id: record.id,
                name: record.name.clone(),
                description: record.description.clone(),
                created_by: record.created_by.clone(),
                created_at: String::new(),
            })
            .collect())
    }

    fn get(&self, id: FormId) -> ApiResult<FormRecord> {
        let state = self.lock()?;
        state
            .forms
            .iter()
            .find(|record| record.id == id)
            .cloned()
            .ok_or(ApiError::NotFound)
    }

    fn create(&self, form: &NewForm) -> ApiResult<FormRecord> {
        let record = FormRecord {
            id: FormId::generate(),
            name: form.name.clone(),
            description: form.description.clone(),
            form_data: form.form_data.clone(),
            drag_structure: form.drag_structure.clone(),
            created_by: form.created_by.clone(),
        };
        self.lock()?.forms.push(record.clone());
        Ok(record)
    }

    fn delete(&self, id: FormId) -> ApiResult<()> {
        let mut state = self.lock()?;
        let before = state.forms.len();
        state.forms.retain(|record| record.id != id);
        if state.forms.len() == before {
            return Err(ApiError::NotFound);
        }
        state.responses.remove(&id);
        Ok(())
    }
}

impl FormResponsesApi for InMemoryForms {
    fn list_for_form(&self, form: FormId) -> ApiResult<Vec<ResponseRecord>> {
        let state = self.lock()?;
        Ok(state.responses.get(&form).cloned().unwrap_or_default())
    }

    fn submit(&self, submission: &ResponseSubmission) -> ApiResult<()> {
        let mut state = self.lock()?;
        if !state.forms.iter().any(|record| record.id == submission.form_id) {
            return Err(ApiError::NotFound);
        }
        let record = ResponseRecord {
            id: Uuid::new_v4(),
            form_id: submission.form_id,
            session_id: submission.session_id,
            responses: submission.responses.clone(),
            created_at: submission.submitted_at.clone(),
        };
        state.responses.entry(submission.form_id).or_default().push(record);
        Ok(())
    }
}
