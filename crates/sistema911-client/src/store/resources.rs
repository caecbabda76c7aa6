//! The list resources the registry exposes

use async_trait::async_trait;
use sistema911_model::{
    Address, AddressUpdate, BankAccount, BankAccountUpdate, EmergencyContact, EmergencyContactUpdate,
    EmergencyEvent, EmergencyEventUpdate, HealthInsurance, HealthInsuranceUpdate, ListEvent, NewAddress,
    NewBankAccount, NewEmergencyContact, NewEmergencyEvent, NewHealthInsurance,
};

use super::list::{ListResource, ListStore, Messages};
use crate::api::ApiClient;
use crate::error::ApiError;

macro_rules! list_resource {
    (
        $marker:ident, $name:literal,
        item = $item:ty, create = $create:ty, update = $update:ty,
        api = ($list:ident, $create_fn:ident, $update_fn:ident, $delete_fn:ident),
        messages = $messages:expr
    ) => {
        pub struct $marker;

        #[async_trait]
        impl ListResource for $marker {
            type Item = $item;
            type Create = $create;
            type Update = $update;

            const NAME: &'static str = $name;
            const MESSAGES: Messages = $messages;

            async fn list(api: &ApiClient) -> Result<Vec<$item>, ApiError> {
                api.$list().await
            }

            async fn create(api: &ApiClient, input: &$create) -> Result<$item, ApiError> {
                api.$create_fn(input).await
            }

            async fn update(api: &ApiClient, id: &str, update: &$update) -> Result<$item, ApiError> {
                api.$update_fn(id, update).await
            }

            async fn delete(api: &ApiClient, id: &str) -> Result<(), ApiError> {
                api.$delete_fn(id).await
            }
        }
    };
}

list_resource!(
    Addresses, "addresses",
    item = Address, create = NewAddress, update = AddressUpdate,
    api = (get_addresses, create_address, update_address, delete_address),
    messages = Messages {
        fetch: "Error al cargar las direcciones",
        create: "Error al crear la dirección",
        update: "Error al actualizar la dirección",
        delete: "Error al eliminar la dirección",
    }
);

list_resource!(
    EmergencyContacts, "emergency_contacts",
    item = EmergencyContact, create = NewEmergencyContact, update = EmergencyContactUpdate,
    api = (
        get_emergency_contacts,
        create_emergency_contact,
        update_emergency_contact,
        delete_emergency_contact
    ),
    messages = Messages {
        fetch: "Error al cargar los contactos de emergencia",
        create: "Error al crear el contacto de emergencia",
        update: "Error al actualizar el contacto de emergencia",
        delete: "Error al eliminar el contacto de emergencia",
    }
);

list_resource!(
    HealthInsurances, "health_insurance",
    item = HealthInsurance, create = NewHealthInsurance, update = HealthInsuranceUpdate,
    api = (
        get_health_insurances,
        create_health_insurance,
        update_health_insurance,
        delete_health_insurance
    ),
    messages = Messages {
        fetch: "Error al cargar los seguros de salud",
        create: "Error al crear el seguro de salud",
        update: "Error al actualizar el seguro de salud",
        delete: "Error al eliminar el seguro de salud",
    }
);

list_resource!(
    BankAccounts, "bank_accounts",
    item = BankAccount, create = NewBankAccount, update = BankAccountUpdate,
    api = (get_bank_accounts, create_bank_account, update_bank_account, delete_bank_account),
    messages = Messages {
        fetch: "Error al cargar las cuentas bancarias",
        create: "Error al crear la cuenta bancaria",
        update: "Error al actualizar la cuenta bancaria",
        delete: "Error al eliminar la cuenta bancaria",
    }
);

list_resource!(
    EmergencyEvents, "emergency_events",
    item = EmergencyEvent, create = NewEmergencyEvent, update = EmergencyEventUpdate,
    api = (
        get_emergency_events,
        create_emergency_event,
        update_emergency_event,
        delete_emergency_event
    ),
    messages = Messages {
        fetch: "Error al cargar las solicitudes de emergencia",
        create: "Error al crear la solicitud de emergencia",
        update: "Error al actualizar la solicitud de emergencia",
        delete: "Error al eliminar la solicitud de emergencia",
    }
);

pub type AddressStore = ListStore<Addresses>;
pub type EmergencyContactStore = ListStore<EmergencyContacts>;
pub type HealthInsuranceStore = ListStore<HealthInsurances>;
pub type BankAccountStore = ListStore<BankAccounts>;
pub type EmergencyEventStore = ListStore<EmergencyEvents>;

impl ListStore<Addresses> {
    /// Make `id` the primary address. On success every cached address has
    /// `is_primary == (address.id == id)`; an address missing from the cache
    /// is added from the server's answer.
    pub async fn set_primary(&mut self, id: &str) -> Result<Address, ApiError> {
        match self.api.set_primary_address(id).await {
            Ok(address) => {
                let event = if self.state.get(&address.id).is_some() {
                    ListEvent::Updated(address.clone())
                } else {
                    ListEvent::Created(address.clone())
                };
                self.state.apply(event);
                self.state.mark_primary(&address.id);
                Ok(address)
            }
            Err(err) => Err(self.fail(err, "Error al establecer dirección principal")),
        }
    }

    pub fn primary(&self) -> Option<&Address> {
        self.state.primary()
    }
}

impl ListStore<EmergencyEvents> {
    /// Cancel a cached event that is still open
    pub async fn cancel(&mut self, id: &str) -> Result<EmergencyEvent, ApiError> {
        const FALLBACK: &str = "Error al cancelar la solicitud de emergencia";

        let event = match self.state.get(id) {
            Some(event) => event.clone(),
            None => {
                let err = ApiError::Validation(format!("id: emergencia {} no encontrada", id));
                return Err(self.fail(err, FALLBACK));
            }
        };

        match self.api.cancel_emergency_event(&event).await {
            Ok(cancelled) => {
                self.state.apply(ListEvent::Updated(cancelled.clone()));
                Ok(cancelled)
            }
            Err(err) => Err(self.fail(err, FALLBACK)),
        }
    }

    /// Events that are neither resolved nor cancelled
    pub fn open_events(&self) -> impl Iterator<Item = &EmergencyEvent> {
        self.state.items().iter().filter(|e| e.is_open())
    }
}
