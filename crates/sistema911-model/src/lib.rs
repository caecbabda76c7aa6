//! Sistema 911/1619 Registry Model
//!
//! Pure types shared by every client of the registry backend:
//! - Entities a user registers (profile, addresses, contacts, medical info,
//!   insurance, bank accounts, emergency events) and their create/update inputs
//! - Wire dialect mapping between the UI (camelCase) and the backend
//! - List reducer used to mirror server-side collections locally
//! - Input validation (RUT, phone, email, password, blood type)
//!
//! Nothing in this crate performs I/O.
//!
//! # Example
//!
//! ```rust
//! use sistema911_model::{wire, NewAddress, SchemaVersion};
//!
//! let input = NewAddress {
//!     street: "Av. Apoquindo 3000".to_string(),
//!     city: "Santiago".to_string(),
//!     state: "Región Metropolitana".to_string(),
//!     country: "Chile".to_string(),
//!     postal_code: "7550000".to_string(),
//!     label: Some("Trabajo".to_string()),
//!     additional_info: None,
//! };
//!
//! let body = wire::encode(&input, SchemaVersion::Current).unwrap();
//! assert_eq!(body["street_address"], "Av. Apoquindo 3000");
//! assert_eq!(body["region"], "Región Metropolitana");
//! ```

pub mod address;
pub mod bank;
pub mod contact;
pub mod event;
pub mod insurance;
pub mod list;
pub mod medical;
pub mod timestamp;
pub mod user;
pub mod validation;
pub mod wire;

// Re-export commonly used types for convenience
pub use address::{Address, AddressUpdate, NewAddress};
pub use bank::{mask_account_number, AccountType, BankAccount, BankAccountUpdate, NewBankAccount};
pub use contact::{EmergencyContact, EmergencyContactUpdate, NewEmergencyContact};
pub use event::{
    ContactInfo, EmergencyEvent, EmergencyEventUpdate, EmergencyKind, EmbeddedContact,
    EventStatus, GeoLocation, MedicalSnapshot, NewEmergencyEvent, Priority,
};
pub use insurance::{HealthInsurance, HealthInsuranceUpdate, NewHealthInsurance};
pub use list::{Keyed, ListEvent, ListState, Primary};
pub use medical::{MedicalInfo, MedicalInfoInput, MedicalInfoUpdate};
pub use user::{
    EmailAvailability, EmailVerification, LoginCredentials, ProfileUpdate, RegistrationForm,
    RegistrationProfile, Role, User,
};
pub use validation::{ValidationError, ValidationErrorCode, ValidationResult};
pub use wire::{SchemaVersion, WireEntity, WireFormat};
