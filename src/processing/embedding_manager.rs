//! Embedding model management for downloading and locating Model2Vec models

use crate::error::{Result, ScreenerError};
use hf_hub::api::tokio::Api;
use log::{info, warn};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashSet};
use std::path::{Path, PathBuf};
use tokio::fs;

/// Information about a known embedding model
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmbeddingModelInfo {
    pub name: String,
    pub repo_id: String,
    pub size_mb: u64,
    pub description: String,
    pub dimensions: u32,
}

/// Files a model directory must hold for `StaticModel::from_pretrained`
const REQUIRED_FILES: [&str; 3] = ["model.safetensors", "tokenizer.json", "config.json"];
const OPTIONAL_FILES: [&str; 1] = ["README.md"];

pub const DEFAULT_EMBEDDING_MODEL: &str = "potion-base-8M";

/// Registry of known models plus the set already present in `models_dir`
pub struct EmbeddingModelManager {
    models_dir: PathBuf,
    available_models: BTreeMap<String, EmbeddingModelInfo>,
    downloaded_models: HashSet<String>,
}

impl EmbeddingModelManager {
    pub async fn new(models_dir: PathBuf) -> Result<Self> {
        // Ensure models directory exists
        if !models_dir.exists() {
            fs::create_dir_all(&models_dir).await.map_err(|e| {
                ScreenerError::ModelLoading(format!("Failed to create models directory: {}", e))
            })?;
        }

        let mut manager = Self {
            models_dir,
            available_models: known_models(),
            downloaded_models: HashSet::new(),
        };
        // Check which models are already downloaded
        manager.scan_downloaded_models().await?;

        Ok(manager)
    }

    async fn scan_downloaded_models(&mut self) -> Result<()> {
        let mut entries = fs::read_dir(&self.models_dir).await.map_err(|e| {
            ScreenerError::ModelLoading(format!("Failed to scan models directory: {}", e))
        })?;

        while let Some(entry) = entries.next_entry().await? {
            if entry.file_type().await?.is_dir() && is_valid_model_directory(&entry.path()).await {
                self.downloaded_models
                    .insert(entry.file_name().to_string_lossy().to_string());
            }
        }

        Ok(())
    }

    /// Download a known model from the Hugging Face Hub into `models_dir`
    pub async fn download_model(&mut self, model_id: &str, force: bool) -> Result<PathBuf> {
        let model_info = self
            .available_models
            .get(model_id)
            .ok_or_else(|| ScreenerError::ModelNotFound(model_id.to_string()))?
            .clone();

        let model_dir = self.models_dir.join(model_id);
        if !force && self.downloaded_models.contains(model_id) {
            return Ok(model_dir);
        }

        info!(
            "Downloading embedding model {} ({} MB) from {}",
            model_info.name, model_info.size_mb, model_info.repo_id
        );
        fs::create_dir_all(&model_dir).await?;

        // Fetch through the hub cache, then copy into our own directory
        let api = Api::new()
            .map_err(|e| ScreenerError::ModelLoading(format!("Failed to initialize HF API: {}", e)))?;
        let repo = api.model(model_info.repo_id.clone());

        for file in REQUIRED_FILES {
            let cached = repo.get(file).await.map_err(|e| {
                ScreenerError::ModelLoading(format!("Failed to download required file {}: {}", file, e))
            })?;
            fs::copy(&cached, model_dir.join(file)).await?;
            info!("  downloaded {}", file);
        }
        // Optional files may be missing from the repo
        for file in OPTIONAL_FILES {
            match repo.get(file).await {
                Ok(cached) => {
                    fs::copy(&cached, model_dir.join(file)).await?;
                }
                Err(e) => warn!("Optional file {} not found: {}", file, e),
            }
        }

        self.downloaded_models.insert(model_id.to_string());
        info!("Embedding model {} ready at {}", model_info.name, model_dir.display());
        Ok(model_dir)
    }

    pub fn get_model_path(&self, model_id: &str) -> Option<PathBuf> {
        self.downloaded_models
            .contains(model_id)
            .then(|| self.models_dir.join(model_id))
    }

    pub async fn ensure_model_available(&mut self, model_id: &str) -> Result<PathBuf> {
        match self.get_model_path(model_id) {
            Some(path) => Ok(path),
            None => self.download_model(model_id, false).await,
        }
    }

    /// Known models, ordered by id
    pub fn list_available_models(&self) -> Vec<(&String, &EmbeddingModelInfo)> {
        self.available_models.iter().collect()
    }

    pub fn is_model_downloaded(&self, model_id: &str) -> bool {
        self.downloaded_models.contains(model_id)
    }

    /// Resolve a model id from an id, a repo id, or a display name
    pub fn resolve_model_id(&self, input: &str) -> Option<String> {
        if self.available_models.contains_key(input) {
            return Some(input.to_string());
        }

        let input_lower = input.to_lowercase();
        self.available_models
            .iter()
            .find(|(_, info)| info.repo_id == input || info.name.to_lowercase() == input_lower)
            .map(|(id, _)| id.clone())
    }
}

async fn is_valid_model_directory(path: &Path) -> bool {
    for file in REQUIRED_FILES {
        if fs::metadata(path.join(file)).await.is_err() {
            return false;
        }
    }
    true
}

fn known_models() -> BTreeMap<String, EmbeddingModelInfo> {
    let mut models = BTreeMap::new();
    models.insert(
        DEFAULT_EMBEDDING_MODEL.to_string(),
        EmbeddingModelInfo {
            name: "Potion Base 8M".to_string(),
            repo_id: "minishlab/potion-base-8M".to_string(),
            size_mb: 33,
            description: "Compact static embeddings, good quality for its size".to_string(),
            dimensions: 256,
        },
    );
    models.insert(
        "m2v-base".to_string(),
        EmbeddingModelInfo {
            name: "Model2Vec Base".to_string(),
            repo_id: "minishlab/M2V_base_output".to_string(),
            size_mb: 90,
            description: "Original Model2Vec base embeddings".to_string(),
            dimensions: 256,
        },
    );
    models.insert(
        "potion-retrieval-32M".to_string(),
        EmbeddingModelInfo {
            name: "Potion Retrieval 32M".to_string(),
            repo_id: "minishlab/potion-retrieval-32M".to_string(),
            size_mb: 130,
            description: "Larger Potion model tuned for retrieval".to_string(),
            dimensions: 512,
        },
    );
    models
}
