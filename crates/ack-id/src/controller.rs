
use ack_vc::{create_credential, CreateCredentialParams, W3CCredential, CONTROLLER_CREDENTIAL_TYPE};

/// Parameters for [`create_controller_credential`].
#[derive(Debug, Clone)]
pub struct CreateControllerCredentialParams {
    pub id: Option<String>,
    /// The agent DID being vouched for.
    pub subject: String,
    /// The DID that controls `subject`.
    pub controller: String,
    pub issuer: String,
}

impl CreateControllerCredentialParams {
    pub fn new(
        subject: impl Into<String>,
        controller: impl Into<String>,
        issuer: impl Into<String>,
    ) -> Self {
        Self {
            id: None,
            subject: subject.into(),
            controller: controller.into(),
            issuer: issuer.into(),
        }
    }

    pub fn id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }
}

/// An unsigned `ControllerCredential` asserting `{id: subject, controller}`.
pub fn create_controller_credential(params: CreateControllerCredentialParams) -> W3CCredential {
    let mut create = CreateCredentialParams::new(params.issuer, params.subject)
        .credential_type(CONTROLLER_CREDENTIAL_TYPE)
        .claim("controller", params.controller);
    if let Some(id) = params.id {
        create = create.id(id);
    }
    create_credential(create)
}
