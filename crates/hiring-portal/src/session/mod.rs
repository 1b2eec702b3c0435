//! Credential decoding, the signed-in identity and the session lifecycle.

mod credential;
mod identity;
mod navigation;
mod registration;
mod storage;
mod store;

pub use credential::{decode, decode_claims, encode_unsigned, CredentialClaims, InvalidCredential};
pub use identity::{Identity, Role, UserId};
pub use navigation::{Navigator, RecordingNavigator};
pub use registration::{RegistrationError, RegistrationProfile};
pub use storage::{
    CredentialStorage, FileCredentialStorage, MemoryCredentialStorage, StorageError,
    CREDENTIAL_KEY,
};
pub use store::{RegistrationRedirect, RestoreOutcome, SessionError, SessionStore};
