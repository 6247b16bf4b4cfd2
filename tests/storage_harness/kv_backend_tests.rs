//! Macro-generated test suite for the `KvBackend` contract.
//!
//! # Generated Tests
//!
//! - `test_get_missing` — unknown key reads as `None`
//! - `test_set_then_get` — values come back verbatim
//! - `test_set_overwrites` — last write wins
//! - `test_remove` — remove reports whether the key existed
//! - `test_keys_sorted` — `keys()` lists every stored key in order
//! - `test_concurrent_writes` — parallel writers to distinct keys all land

/// Generate a `KvBackend` conformance test suite.
///
/// `$factory` must evaluate to a fresh backend; it is re-evaluated per test.
/// The concurrent test also needs the backend to be `Clone + 'static`.
#[macro_export]
macro_rules! kv_backend_tests {
    ($factory:expr) => {
        mod kv_backend_contract_tests {
            use super::*;
            use storefront::core::service::KvBackend;

            #[tokio::test]
            async fn test_get_missing() {
                let kv = $factory;
                assert_eq!(kv.get("storefront:nothing").await.unwrap(), None);
            }

            #[tokio::test]
            async fn test_set_then_get() {
                let kv = $factory;
                let json = r#"[{"id":"p1","name":"Kurta, \"men\""}]"#;
                kv.set("storefront:products", json.to_string()).await.unwrap();
                assert_eq!(
                    kv.get("storefront:products").await.unwrap().as_deref(),
                    Some(json)
                );
            }

            #[tokio::test]
            async fn test_set_overwrites() {
                let kv = $factory;
                kv.set("storefront:cart", "[1]".to_string()).await.unwrap();
                kv.set("storefront:cart", "[2]".to_string()).await.unwrap();
                assert_eq!(
                    kv.get("storefront:cart").await.unwrap().as_deref(),
                    Some("[2]")
                );
            }

            #[tokio::test]
            async fn test_remove() {
                let kv = $factory;
                kv.set("storefront:session", "null".to_string()).await.unwrap();
                assert!(kv.remove("storefront:session").await.unwrap());
                assert!(!kv.remove("storefront:session").await.unwrap());
                assert_eq!(kv.get("storefront:session").await.unwrap(), None);
            }

            #[tokio::test]
            async fn test_keys_sorted() {
                let kv = $factory;
                for key in ["storefront:slides", "storefront:cart", "storefront:orders"] {
                    kv.set(key, "[]".to_string()).await.unwrap();
                }
                assert_eq!(
                    kv.keys().await.unwrap(),
                    vec!["storefront:cart", "storefront:orders", "storefront:slides"]
                );
            }

            #[tokio::test]
            async fn test_concurrent_writes() {
                let kv = $factory;
                let mut handles = Vec::new();
                for i in 0..8 {
                    let kv = kv.clone();
                    handles.push(tokio::spawn(async move {
                        kv.set(&format!("key:{}", i), i.to_string()).await.unwrap();
                    }));
                }
                for handle in handles {
                    handle.await.unwrap();
                }
                assert_eq!(kv.keys().await.unwrap().len(), 8);
                assert_eq!(kv.get("key:5").await.unwrap().as_deref(), Some("5"));
            }
        }
    };
}
