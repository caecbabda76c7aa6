//! Store for the medical-info singleton

use sistema911_model::{MedicalInfo, MedicalInfoInput, MedicalInfoUpdate};
use tracing::warn;

use crate::api::ApiClient;
use crate::error::ApiError;

/// `{medical_info, is_loading, error}`. A user with no record yet is
/// `medical_info: None` with no error.
pub struct MedicalInfoStore {
    api: ApiClient,
    medical_info: Option<MedicalInfo>,
    is_loading: bool,
    error: Option<String>,
}

impl MedicalInfoStore {
    pub fn new(api: ApiClient) -> Self {
        Self {
            api,
            medical_info: None,
            is_loading: false,
            error: None,
        }
    }

    pub fn medical_info(&self) -> Option<&MedicalInfo> {
        self.medical_info.as_ref()
    }

    pub fn is_loading(&self) -> bool {
        self.is_loading
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub async fn mount(&mut self) -> Result<(), ApiError> {
        self.fetch().await
    }

    pub async fn fetch(&mut self) -> Result<(), ApiError> {
        self.is_loading = true;
        self.error = None;
        let result = self.api.get_medical_info().await;
        self.is_loading = false;

        match result {
            Ok(info) => {
                self.medical_info = info;
                Ok(())
            }
            Err(err) => Err(self.fail(err, "Error al cargar la información médica")),
        }
    }

    pub async fn create(&mut self, input: MedicalInfoInput) -> Result<MedicalInfo, ApiError> {
        self.error = None;
        let result = self.api.create_medical_info(input).await;
        self.store(result, "Error al crear la información médica")
    }

    pub async fn update(&mut self, update: MedicalInfoUpdate) -> Result<MedicalInfo, ApiError> {
        self.error = None;
        let result = self.api.update_medical_info(update).await;
        self.store(result, "Error al actualizar la información médica")
    }

    pub async fn upsert(&mut self, input: MedicalInfoInput) -> Result<MedicalInfo, ApiError> {
        self.error = None;
        let result = self.api.upsert_medical_info(input).await;
        self.store(result, "Error al guardar la información médica")
    }

    pub async fn delete(&mut self) -> Result<(), ApiError> {
        self.error = None;
        match self.api.delete_medical_info().await {
            Ok(()) => {
                self.medical_info = None;
                Ok(())
            }
            Err(err) => Err(self.fail(err, "Error al eliminar la información médica")),
        }
    }

    fn store(&mut self, result: Result<MedicalInfo, ApiError>, fallback: &str) -> Result<MedicalInfo, ApiError> {
        match result {
            Ok(info) => {
                self.medical_info = Some(info.clone());
                Ok(info)
            }
            Err(err) => Err(self.fail(err, fallback)),
        }
    }

    fn fail(&mut self, err: ApiError, fallback: &str) -> ApiError {
        warn!(resource = "medical_info", error = %err, "{}", fallback);
        self.error = Some(err.display_message(fallback));
        err
    }
}
