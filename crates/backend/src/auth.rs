use async_trait::async_trait;
use serde_json::json;

use velora_auth::{AuthBackend, NewProfile, ProfileUpdate, Session, UserProfile};
use velora_core::{BackendError, UserId};

use crate::rest::RestBackend;
use crate::rows::{ProfileInsert, ProfilePatch, ProfileRow, SessionResponse};

#[async_trait]
impl AuthBackend for RestBackend {
    async fn sign_up(&self, email: &str, password: &str) -> Result<Session, BackendError> {
        let url = self.auth_url("signup");
        let body = json!({ "email": email, "password": password });
        let resp: SessionResponse = self.send_json(self.post(url).json(&body)).await?;
        Ok(resp.into())
    }

    async fn sign_in(&self, email: &str, password: &str) -> Result<Session, BackendError> {
        let url = self.auth_url("token?grant_type=password");
        let body = json!({ "email": email, "password": password });
        let resp: SessionResponse = self.send_json(self.post(url).json(&body)).await?;
        Ok(resp.into())
    }

    async fn sign_out(&self, session: &Session) -> Result<(), BackendError> {
        let url = self.auth_url("logout");
        let req = self.post_as(url, &session.access_token);
        self.send_ok(req).await
    }

    async fn profile_by_email(&self, email: &str) -> Result<Option<UserProfile>, BackendError> {
        let url = self.rest_url(&format!(
            "users?select=*&email=eq.{}&limit=1",
            urlencoding::encode(email)
        ));
        let rows: Vec<ProfileRow> = self.send_json(self.get(url)).await?;
        Ok(rows.into_iter().next().map(Into::into))
    }

    async fn profile_by_id(&self, id: UserId) -> Result<Option<UserProfile>, BackendError> {
        let url = self.rest_url(&format!("users?select=*&id=eq.{id}&limit=1"));
        let rows: Vec<ProfileRow> = self.send_json(self.get(url)).await?;
        Ok(rows.into_iter().next().map(Into::into))
    }

    async fn insert_profile(&self, profile: NewProfile) -> Result<(), BackendError> {
        let url = self.rest_url("users");
        let body = ProfileInsert {
            id: profile.id,
            email: profile.email,
            name: profile.name,
        };
        self.send_ok(self.post(url).json(&body)).await
    }

    async fn update_profile(
        &self,
        id: UserId,
        update: ProfileUpdate,
    ) -> Result<UserProfile, BackendError> {
        let url = self.rest_url(&format!("users?id=eq.{id}"));
        let body = ProfilePatch {
            name: update.name,
            mobile: update.phone,
            address: update.address,
        };
        let req = self
            .patch(url)
            .header("Prefer", "return=representation")
            .json(&body);
        let rows: Vec<ProfileRow> = self.send_json(req).await?;
        rows.into_iter()
            .next()
            .map(Into::into)
            .ok_or_else(|| BackendError::api(404, "profile row not found"))
    }
}
