use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde_json::Value;
use uuid::Uuid;

/// Metal record
///
/// Represents a single metal entry in the catalog. Typed columns cover the
/// fields every record carries; everything else lives in the free-form
/// `attributes` document.
///
/// # Invariants
/// - Name cannot be empty
/// - Density must be positive (if specified)
/// - Attributes must be a JSON object
/// - `added_by` is immutable after creation
/// - A soft-deleted record cannot be soft-deleted again
///
/// # Example
/// ```
/// use metals_api::domain::metal::Metal;
/// use uuid::Uuid;
///
/// let metal = Metal::new(
///     "Copper".to_string(),
///     Some("C11000".to_string()),
///     None,
///     serde_json::json!({}),
///     Uuid::new_v4(),
/// ).expect("valid metal");
///
/// assert_eq!(metal.name(), "Copper");
/// assert!(!metal.is_deleted());
/// ```
#[derive(Debug, Clone)]
pub struct Metal {
    id: Uuid,
    name: String,
    grade: Option<String>,
    density: Option<Decimal>,
    attributes: Value,
    added_by: Uuid,
    updated_by: Option<Uuid>,
    is_deleted: bool,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

/// Full-replace payload for the mutable fields of a metal
#[derive(Debug, Clone)]
pub struct MetalUpdate {
    pub name: String,
    pub grade: Option<String>,
    pub density: Option<Decimal>,
    pub attributes: Value,
}

/// Partial-update payload; `None` leaves the field unchanged
#[derive(Debug, Clone, Default, serde::Deserialize)]
#[serde(default)]
pub struct MetalPatch {
    pub name: Option<String>,
    pub grade: Option<String>,
    pub density: Option<Decimal>,
    pub attributes: Option<Value>,
}

impl MetalPatch {
    /// True when the patch carries no changes at all
    pub fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.grade.is_none()
            && self.density.is_none()
            && self.attributes.is_none()
    }

    /// Validates the fields the patch does carry
    pub fn validate(&self) -> Result<(), String> {
        if let Some(name) = &self.name {
            validate_name(name)?;
        }
        if let Some(density) = self.density {
            validate_density(density)?;
        }
        if let Some(attributes) = &self.attributes {
            validate_attributes(attributes)?;
        }
        Ok(())
    }
}

fn validate_name(name: &str) -> Result<(), String> {
    if name.trim().is_empty() {
        return Err("Name cannot be empty".to_string());
    }
    Ok(())
}

fn validate_density(density: Decimal) -> Result<(), String> {
    if density <= Decimal::ZERO {
        return Err("Density must be positive".to_string());
    }
    Ok(())
}

fn validate_attributes(attributes: &Value) -> Result<(), String> {
    if !attributes.is_object() {
        return Err("Attributes must be a JSON object".to_string());
    }
    Ok(())
}

impl Metal {
    /// Creates a new Metal record
    ///
    /// # Arguments
    /// * `name` - Display name (cannot be empty)
    /// * `grade` - Optional grade designation
    /// * `density` - Optional density (must be positive if specified)
    /// * `attributes` - Free-form JSON object of extra fields
    /// * `added_by` - ID of the user creating the record
    ///
    /// # Returns
    /// * `Ok(Metal)` - New record with a fresh ID and timestamps
    /// * `Err(String)` - If any invariant is violated
    pub fn new(
        name: String,
        grade: Option<String>,
        density: Option<Decimal>,
        attributes: Value,
        added_by: Uuid,
    ) -> Result<Self, String> {
        validate_name(&name)?;
        if let Some(density) = density {
            validate_density(density)?;
        }
        validate_attributes(&attributes)?;

        let now = Utc::now();
        Ok(Self {
            id: Uuid::new_v4(),
            name,
            grade,
            density,
            attributes,
            added_by,
            updated_by: None,
            is_deleted: false,
            created_at: now,
            updated_at: now,
        })
    }

    /// Replaces all mutable fields with the given payload
    ///
    /// Bookkeeping fields (`updated_by`, `updated_at`) are refreshed;
    /// `added_by` and `created_at` are never touched.
    pub fn apply_update(&mut self, update: MetalUpdate, updated_by: Uuid) -> Result<(), String> {
        validate_name(&update.name)?;
        if let Some(density) = update.density {
            validate_density(density)?;
        }
        validate_attributes(&update.attributes)?;

        self.name = update.name;
        self.grade = update.grade;
        self.density = update.density;
        self.attributes = update.attributes;
        self.touch(updated_by);
        Ok(())
    }

    /// Applies only the fields present in the patch
    pub fn apply_patch(&mut self, patch: MetalPatch, updated_by: Uuid) -> Result<(), String> {
        if patch.is_empty() {
            return Err("Patch contains no fields to update".to_string());
        }
        patch.validate()?;

        if let Some(name) = patch.name {
            self.name = name;
        }
        if let Some(grade) = patch.grade {
            self.grade = Some(grade);
        }
        if let Some(density) = patch.density {
            self.density = Some(density);
        }
        if let Some(attributes) = patch.attributes {
            self.attributes = attributes;
        }
        self.touch(updated_by);
        Ok(())
    }

    /// Marks the record as soft-deleted
    ///
    /// # Returns
    /// * `Err(String)` - If the record is already soft-deleted
    pub fn mark_deleted(&mut self, updated_by: Uuid) -> Result<(), String> {
        if self.is_deleted {
            return Err("Record is already deleted".to_string());
        }
        self.is_deleted = true;
        self.touch(updated_by);
        Ok(())
    }

    fn touch(&mut self, updated_by: Uuid) {
        self.updated_by = Some(updated_by);
        self.updated_at = Utc::now();
    }

    // ===== Getters =====

    /// Returns the record's ID
    pub fn id(&self) -> Uuid {
        self.id
    }

    /// Returns the metal's name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the grade designation if one was set
    pub fn grade(&self) -> Option<&str> {
        self.grade.as_deref()
    }

    /// Returns the density if one was set
    pub fn density(&self) -> Option<Decimal> {
        self.density
    }

    /// Returns the free-form attributes document
    pub fn attributes(&self) -> &Value {
        &self.attributes
    }

    /// Returns the ID of the user who created the record
    pub fn added_by(&self) -> Uuid {
        self.added_by
    }

    /// Returns the ID of the user who last modified the record
    pub fn updated_by(&self) -> Option<Uuid> {
        self.updated_by
    }

    /// Returns whether the record is soft-deleted
    pub fn is_deleted(&self) -> bool {
        self.is_deleted
    }

    /// Returns the creation timestamp
    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Returns the last-modification timestamp
    pub fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    /// Reconstructs a Metal from persistence layer data
    ///
    /// This method bypasses business rules validation since the data
    /// is already validated and stored in the database.
    ///
    /// # Note
    /// Only to be used by repository implementations for data reconstruction.
    #[allow(clippy::too_many_arguments)]
    pub fn from_persistence(
        id: Uuid,
        name: String,
        grade: Option<String>,
        density: Option<Decimal>,
        attributes: Value,
        added_by: Uuid,
        updated_by: Option<Uuid>,
        is_deleted: bool,
        created_at: DateTime<Utc>,
        updated_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            name,
            grade,
            density,
            attributes,
            added_by,
            updated_by,
            is_deleted,
            created_at,
            updated_at,
        }
    }
}
