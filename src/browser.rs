//! Browser seam that drives the resource owner through the authorization pages.
//!
//! The client only scripts the interaction (open the authorization URL, fill the login form,
//! submit, confirm). Rendering pages and following redirects belong to the
//! [`BrowserInteraction`] implementation, which reports the first redirect aimed at the
//! callback as [`BrowserOutcome::Intercepted`].

// self
use crate::{
	_prelude::*,
	auth::Secret,
	config::AdminAccess,
};

/// Boxed future returned by [`BrowserInteraction`] methods.
pub type BrowserFuture<'a, T, E> = Pin<Box<dyn Future<Output = Result<T, E>> + 'a + Send>>;

/// Result of a navigation step.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum BrowserOutcome {
	/// The step finished on a regular page.
	Completed,
	/// The step triggered a redirect that the browser stopped instead of following.
	Intercepted {
		/// Redirect target, usually the callback URI with `oauth_token` and `oauth_verifier`.
		target: Url,
	},
}

/// Capability to navigate pages, fill form fields, and click elements.
pub trait BrowserInteraction
where
	Self: Send,
{
	/// Concrete error emitted by the browser implementation.
	type Error: 'static + Send + Sync + StdError;

	/// Opens `url`.
	fn navigate<'a>(&'a mut self, url: &'a str) -> BrowserFuture<'a, BrowserOutcome, Self::Error>;

	/// Sets the form field named `field` on the current page.
	fn fill_field<'a>(
		&'a mut self,
		field: &'a str,
		value: &'a str,
	) -> BrowserFuture<'a, (), Self::Error>;

	/// Clicks the element matching `selector` on the current page.
	fn click<'a>(&'a mut self, selector: &'a str) -> BrowserFuture<'a, BrowserOutcome, Self::Error>;
}

/// Field names and selectors of the login and confirmation pages.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LoginForm {
	/// Name of the username input.
	pub username_field: String,
	/// Name of the password input.
	pub password_field: String,
	/// Selector of the login submit button.
	pub submit_selector: String,
	/// Selector of the button granting access.
	pub confirm_selector: String,
}
impl Default for LoginForm {
	fn default() -> Self {
		Self {
			username_field: "login[username]".into(),
			password_field: "login[password]".into(),
			submit_selector: "[type=submit]".into(),
			confirm_selector: "[title=Authorize]".into(),
		}
	}
}

/// Resource owner login used to approve the temporary credentials.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ResourceOwnerLogin {
	/// Login name.
	pub username: String,
	/// Password.
	pub password: Secret,
	/// Form layout of the authorization pages.
	pub form: LoginForm,
}
impl ResourceOwnerLogin {
	/// Creates a login using the default form layout.
	pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
		Self { username: username.into(), password: Secret::new(password), form: LoginForm::default() }
	}

	/// Replaces the form layout.
	pub fn with_form(mut self, form: LoginForm) -> Self {
		self.form = form;

		self
	}
}
impl From<&AdminAccess> for ResourceOwnerLogin {
	fn from(admin: &AdminAccess) -> Self {
		Self {
			username: admin.username.clone(),
			password: admin.password.clone(),
			form: LoginForm::default(),
		}
	}
}

/// Runs the authorization script and returns the first intercepted redirect, if any.
pub(crate) async fn run_authorization_script<B>(
	browser: &mut B,
	authorization_url: &str,
	login: &ResourceOwnerLogin,
) -> Result<Option<Url>, B::Error>
where
	B: ?Sized + BrowserInteraction,
{
	if let BrowserOutcome::Intercepted { target } = browser.navigate(authorization_url).await? {
		return Ok(Some(target));
	}

	browser.fill_field(&login.form.username_field, &login.username).await?;
	browser.fill_field(&login.form.password_field, login.password.expose()).await?;

	for selector in [&login.form.submit_selector, &login.form.confirm_selector] {
		if let BrowserOutcome::Intercepted { target } = browser.click(selector).await? {
			return Ok(Some(target));
		}
	}

	Ok(None)
}
