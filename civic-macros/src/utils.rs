use quote::ToTokens;
use syn::{Attribute, Field, FieldsNamed, Ident, Path, Token, punctuated::Punctuated};

/// 把宏需要的派生与用户已写的 `#[derive(...)]` 合成一条
///
/// 宏要求的派生排在前面；同名派生只保留一次（`Serialize` 与
/// `serde::Serialize` 视为同一项）。其余属性保持原有顺序，排在合成的 derive 之后。
pub(crate) fn apply_derives(attrs: &mut Vec<Attribute>, required: Vec<Path>) {
    let mut derives = required;
    let mut others = Vec::with_capacity(attrs.len());

    for attr in attrs.drain(..) {
        if !attr.path().is_ident("derive") {
            others.push(attr);
            continue;
        }
        // 无法解析的 derive 交给编译器报错，这里原样保留
        match attr.parse_args_with(Punctuated::<Path, Token![,]>::parse_terminated) {
            Ok(list) => derives.extend(list),
            Err(_) => others.push(attr),
        }
    }

    let mut names: Vec<String> = Vec::with_capacity(derives.len());
    derives.retain(|path| {
        let name = derive_name(path);
        if names.contains(&name) {
            false
        } else {
            names.push(name);
            true
        }
    });

    attrs.push(syn::parse_quote!(#[derive(#(#derives),*)]));
    attrs.extend(others);
}

// 派生的比较名：取最后一段，serde 的两个派生统一带上 crate 前缀
fn derive_name(path: &Path) -> String {
    match path.segments.last() {
        Some(segment) if segment.ident == "Serialize" || segment.ident == "Deserialize" => {
            format!("serde::{}", segment.ident)
        }
        Some(segment) => segment.ident.to_string(),
        None => path.to_token_stream().to_string(),
    }
}

/// 让 `required` 中的字段按给定顺序排在结构体最前
///
/// 用户已声明的同名字段沿用用户的定义（连同其属性），其余字段顺序不变。
pub(crate) fn ensure_leading_fields(fields_named: &mut FieldsNamed, required: Vec<Field>) {
    let mut rest: Vec<Field> = std::mem::take(&mut fields_named.named).into_iter().collect();
    let mut leading: Punctuated<Field, Token![,]> = Punctuated::new();

    for field in required {
        let declared = rest
            .iter()
            .position(|f| f.ident.is_some() && f.ident == field.ident);
        match declared {
            Some(index) => leading.push(rest.remove(index)),
            None => leading.push(field),
        }
    }

    leading.extend(rest);
    fields_named.named = leading;
}

/// 属性参数中的键只能出现一次
pub(crate) fn set_once<T>(slot: &mut Option<T>, value: T, key: &Ident) -> syn::Result<()> {
    if slot.is_some() {
        return Err(syn::Error::new(
            key.span(),
            format!("duplicate key '{key}' in attribute"),
        ));
    }
    *slot = Some(value);
    Ok(())
}
