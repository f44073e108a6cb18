/// Methods shared by every client that wraps a `ResourceClient`: construction,
/// an `Option`-returning lookup, role administration and event access.
macro_rules! impl_basic_client {
    ($client_name:ident, $entity:ty, $error:ty, $entity_name_snake:ident) => {
        paste::paste! {
            #[allow(dead_code)]
            impl $client_name {
                pub fn new(inner: $crate::actor_framework::ResourceClient<$entity>) -> Self {
                    Self { inner }
                }

                /// Address of the component behind this client.
                pub fn address(&self) -> $crate::domain::Address {
                    self.inner.address()
                }

                #[tracing::instrument(skip(self))]
                pub async fn [<find_ $entity_name_snake>](
                    &self,
                    id: <$entity as $crate::actor_framework::Entity>::Id,
                ) -> Result<Option<$entity>, $error> {
                    tracing::debug!("Sending request");
                    self.inner.get(id).await
                }

                #[tracing::instrument(skip(self))]
                pub async fn grant_role(
                    &self,
                    sender: $crate::domain::Address,
                    role: $crate::domain::Role,
                    account: $crate::domain::Address,
                ) -> Result<(), $error> {
                    tracing::debug!("Sending request");
                    self.inner.grant_role(sender, role, account).await
                }

                #[tracing::instrument(skip(self))]
                pub async fn revoke_role(
                    &self,
                    sender: $crate::domain::Address,
                    role: $crate::domain::Role,
                    account: $crate::domain::Address,
                ) -> Result<(), $error> {
                    tracing::debug!("Sending request");
                    self.inner.revoke_role(sender, role, account).await
                }

                #[tracing::instrument(skip(self))]
                pub async fn renounce_role(
                    &self,
                    sender: $crate::domain::Address,
                    role: $crate::domain::Role,
                    account: $crate::domain::Address,
                ) -> Result<(), $error> {
                    tracing::debug!("Sending request");
                    self.inner.renounce_role(sender, role, account).await
                }

                #[tracing::instrument(skip(self))]
                pub async fn has_role(
                    &self,
                    role: $crate::domain::Role,
                    account: $crate::domain::Address,
                ) -> Result<bool, $error> {
                    tracing::debug!("Sending request");
                    self.inner.has_role(role, account).await
                }

                /// Every event committed so far, oldest first.
                pub async fn events(
                    &self,
                ) -> Result<Vec<<$entity as $crate::actor_framework::Entity>::Event>, $error> {
                    self.inner.events().await
                }

                pub fn subscribe(
                    &self,
                ) -> tokio::sync::broadcast::Receiver<<$entity as $crate::actor_framework::Entity>::Event> {
                    self.inner.subscribe()
                }
            }
        }
    };
}

/// Generate client methods with oneshot channel boilerplate and automatic tracing.
macro_rules! client_method {
    ($client:ty => fn $method:ident($($param:ident: $param_type:ty),*) -> $return_type:ty as $request:ident::$variant:ident, Error = $error_type:ty) => {
        #[allow(dead_code)]
        impl $client {
            #[tracing::instrument(skip(self))]
            pub async fn $method(&self, $($param: $param_type),*) -> Result<$return_type, $error_type> {
                tracing::debug!("Sending request");
                let (respond_to, response) = tokio::sync::oneshot::channel();
                self.sender
                    .send($request::$variant {
                        $($param,)*
                        respond_to,
                    })
                    .await
                    .map_err(|_| $crate::actor_framework::FrameworkError::ActorClosed)?;
                response
                    .await
                    .map_err(|_| $crate::actor_framework::FrameworkError::ActorDropped)?
            }
        }
    };
}
