//! # Permissions Macro
//!
//! Procedural macros for automatic permission checking in Plumbline handlers.
//! Supports the `#[with_permission(...)]` attribute for automatic permission validation.

use proc_macro::TokenStream;
use quote::quote;
use syn::{
    parse::{Parse, ParseStream},
    parse_macro_input,
    Expr,
    Ident,
    ItemFn,
    Token,
};

/// Arguments for the with_permission macro
#[derive(Debug)]
enum PermissionMode {
    /// All specified permissions must be granted (AND logic)
    All(Vec<Expr>),
    /// At least one specified permission must be granted (OR logic)
    Any(Vec<Expr>),
}

impl Parse for PermissionMode {
    fn parse(input: ParseStream) -> syn::Result<Self> {
        // Check if we have a mode specifier (all/any) followed by =
        if input.peek(Ident) && input.peek2(Token![=]) {
            let ident: Ident = input.parse()?;
            let mode_name = ident.to_string();
            input.parse::<Token![=]>()?;

            match mode_name.as_str() {
                "all" => {
                    let permissions = parse_permission_list(input)?;
                    Ok(Self::All(permissions))
                },
                "any" => {
                    let permissions = parse_permission_list(input)?;
                    Ok(Self::Any(permissions))
                },
                _ => {
                    Err(syn::Error::new(
                        ident.span(),
                        "Expected 'all' or 'any' before '='",
                    ))
                },
            }
        }
        else {
            // No mode specifier, default to 'all' and parse permission list
            let permissions = parse_permission_list(input)?;
            Ok(Self::All(permissions))
        }
    }
}

/// Parses a comma-separated list of permission expressions from the token stream.
fn parse_permission_list(input: ParseStream) -> syn::Result<Vec<Expr>> {
    let mut permissions = Vec::new();

    loop {
        if input.is_empty() {
            break;
        }

        let expr: Expr = input.parse()?;
        permissions.push(expr);

        if input.is_empty() {
            break;
        }

        input.parse::<Token![,]>()?;
    }

    if permissions.is_empty() {
        return Err(input.error("at least one permission is required"));
    }

    Ok(permissions)
}

/// Attribute macro for checking permissions on handler functions.
///
/// Injects a role-matrix check at the top of the handler body. The handler
/// must have a `user` binding in scope whose `role` field is an
/// `entity::users::UserRole` (the `AuthenticatedUser` produced by the auth
/// middleware satisfies this).
///
/// # Arguments
///
/// Accepts strongly typed Permission enum variants:
/// - **Users**: `Permission::Users(UserAction::Create)`, etc.
/// - **Projects**: `Permission::Projects(ProjectAction::Update)`, etc.
/// - **Repairs**: `Permission::Repairs(RepairAction::Review)`, etc.
///
/// # Modes
///
/// - **all** (default): ALL permissions must be granted (AND logic)
/// - **any**: At least ONE permission must be granted (OR logic)
///
/// # Examples
///
/// ```ignore
/// use axum::Json;
/// use auth::permissions::{Permission, RepairAction};
/// use error::Result;
/// use permissions_macro::with_permission;
///
/// #[with_permission(Permission::Repairs(RepairAction::Review))]
/// pub async fn review_repair_handler(
///     state: &AppState,
///     user: AuthenticatedUser,
///     repair_id: &str,
/// ) -> Result<Json<RepairResponse>> {
///     // Only roles granted repairs:review reach this point
///     # unimplemented!()
/// }
///
/// // 'any' mode - requires at least ONE permission
/// #[with_permission(any = Permission::Repairs(RepairAction::Create), Permission::Repairs(RepairAction::Review))]
/// pub async fn create_or_review(
///     state: &AppState,
///     user: AuthenticatedUser,
/// ) -> Result<Json<RepairResponse>> {
///     # unimplemented!()
/// }
/// ```
///
/// # Compile-Time Validation
///
/// Permission expressions are validated at compile time. Using invalid
/// Permission enum variants will result in compilation errors.
#[proc_macro_attribute]
pub fn with_permission(args: TokenStream, input: TokenStream) -> TokenStream {
    let mode = parse_macro_input!(args as PermissionMode);
    let mut input_fn = parse_macro_input!(input as ItemFn);

    // Generate the permission check code based on mode
    let permission_check = match mode {
        PermissionMode::All(permissions) => generate_all_permission_check(&permissions),
        PermissionMode::Any(permissions) => generate_any_permission_check(&permissions),
    };

    // Wrap the function body with permission checking
    let original_block = input_fn.block;
    #[allow(
        clippy::expect_used,
        reason = "Generated code always parses correctly in procedural macro context"
    )]
    let new_block = syn::parse2(quote! {
        {
            #permission_check
            #original_block
        }
    })
    .expect("Failed to parse generated block");

    input_fn.block = Box::new(new_block);

    quote!(#input_fn).into()
}

/// Generate permission checking code for ALL mode (AND logic)
fn generate_all_permission_check(permissions: &[Expr]) -> proc_macro2::TokenStream {
    let permission_exprs = permissions.iter().map(|expr| quote! { #expr });

    quote! {
        // Requires the handler to have a `user` binding with a `role` field
        // (the AuthenticatedUser injected by the auth middleware).
        let required_permissions = vec![
            #(#permission_exprs),*
        ];

        for perm in &required_permissions {
            if !auth::permissions::PermissionService::role_allows(user.role, perm) {
                return Err(error::AppError::forbidden(
                    format!("Missing required permission: {}", perm)
                ));
            }
        }
    }
}

/// Generate permission checking code for ANY mode (OR logic)
fn generate_any_permission_check(permissions: &[Expr]) -> proc_macro2::TokenStream {
    let permission_exprs = permissions.iter().map(|expr| quote! { #expr });

    quote! {
        let required_permissions = vec![
            #(#permission_exprs),*
        ];

        let has_permission = required_permissions
            .iter()
            .any(|perm| auth::permissions::PermissionService::role_allows(user.role, perm));

        if !has_permission {
            let wanted: Vec<String> = required_permissions.iter().map(|p| p.to_string()).collect();
            return Err(error::AppError::forbidden(
                format!("Missing required permissions. Need at least one of: {}", wanted.join(", "))
            ));
        }
    }
}

#[cfg(test)]
mod tests {
    use syn::parse_str;

    use super::*;

    #[test]
    fn test_parse_all_mode() {
        let input = "Permission::Repairs(RepairAction::Read), Permission::Projects(ProjectAction::Read)";
        let mode: PermissionMode = parse_str(input).unwrap();

        match mode {
            PermissionMode::All(perms) => assert_eq!(perms.len(), 2),
            PermissionMode::Any(_) => panic!("Expected All mode"),
        }
    }

    #[test]
    fn test_parse_any_mode() {
        let input = "any = Permission::Repairs(RepairAction::Create), Permission::Repairs(RepairAction::Review)";
        let mode: PermissionMode = parse_str(input).unwrap();

        match mode {
            PermissionMode::All(_) => panic!("Expected Any mode"),
            PermissionMode::Any(perms) => assert_eq!(perms.len(), 2),
        }
    }

    #[test]
    fn test_parse_default_all_mode() {
        let input = "Permission::Repairs(RepairAction::Review)";
        let mode: PermissionMode = parse_str(input).unwrap();

        match mode {
            PermissionMode::All(perms) => assert_eq!(perms.len(), 1),
            PermissionMode::Any(_) => panic!("Expected All mode"),
        }
    }

    #[test]
    fn test_parse_empty_permissions_error() {
        let input = "";
        let result: syn::Result<PermissionMode> = parse_str(input);
        assert!(result.is_err());
    }
}
