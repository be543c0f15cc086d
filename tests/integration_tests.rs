use datatree_text::{
    from_str, properties, to_string, to_value, tree, xml, CodecRegistry, Document, Error,
    LineEnding, Value, WriteOptions,
};
use serde::Serialize;

fn lf() -> WriteOptions {
    WriteOptions::new().with_line_ending(LineEnding::Lf)
}

#[derive(Serialize)]
struct Account {
    name: String,
    enabled: bool,
}

#[derive(Serialize)]
struct Config {
    service: String,
    ports: Vec<u16>,
    accounts: Vec<Account>,
}

fn sample_config() -> Config {
    Config {
        service: "billing".to_string(),
        ports: vec![8001, 8002],
        accounts: vec![
            Account {
                name: "Admin".to_string(),
                enabled: true,
            },
            Account {
                name: "User".to_string(),
                enabled: false,
            },
        ],
    }
}

#[test]
fn test_database_ports_example() {
    let text = "database.ports.0=8001\ndatabase.ports.1=8002\ndatabase.ports.2=8002";
    let doc = properties::from_str(text);

    let ports = doc.get("database.ports").unwrap().unwrap();
    assert!(ports.is_enumeration());
    assert_eq!(
        ports,
        &Value::List(vec![
            Value::from("8001"),
            Value::from("8002"),
            Value::from("8002"),
        ])
    );
    assert_eq!(doc.first_indexes().get("database.ports"), Some(0));
    assert_eq!(properties::to_string(&doc, &lf()), format!("{}\n", text));
}

#[test]
fn test_one_based_groups_stay_one_based() {
    let text = "account.1.name=Admin\naccount.1.enabled=true\naccount.2.name=User\naccount.2.enabled=false\n";
    let doc = properties::from_str(text);
    assert_eq!(doc.get("account[0].name").unwrap(), Some(&Value::from("Admin")));
    assert_eq!(properties::to_string(&doc, &lf()), text);
}

#[test]
fn test_mixed_siblings_never_form_a_list() {
    let doc = properties::from_str("a.1=x\na.foo=y");
    assert_eq!(
        doc.root(),
        &tree!({ "a": { "1": "x", "foo": "y" } })
    );
}

#[test]
fn test_serde_struct_to_properties() {
    let doc = Document::new(to_value(&sample_config()).unwrap());
    assert_eq!(
        properties::to_string(&doc, &lf()),
        "service=billing\n\
         ports.1=8001\nports.2=8002\n\
         accounts.1.name=Admin\naccounts.1.enabled=true\n\
         accounts.2.name=User\naccounts.2.enabled=false\n"
    );
}

#[test]
fn test_serde_struct_through_xml() {
    let value = to_value(&sample_config()).unwrap();
    let doc = Document::new(value.clone());
    let text = xml::to_string(&doc, &WriteOptions::pretty().with_line_ending(LineEnding::Lf));
    assert_eq!(
        text,
        "<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n\
         <xml>\n\
         \x20 <service>billing</service>\n\
         \x20 <ports>\n\
         \x20   <item>8001</item>\n\
         \x20   <item>8002</item>\n\
         \x20 </ports>\n\
         \x20 <accounts>\n\
         \x20   <item>\n\
         \x20     <name>Admin</name>\n\
         \x20     <enabled>true</enabled>\n\
         \x20   </item>\n\
         \x20   <item>\n\
         \x20     <name>User</name>\n\
         \x20     <enabled>false</enabled>\n\
         \x20   </item>\n\
         \x20 </accounts>\n\
         </xml>"
    );
    assert_eq!(xml::from_str(&text).unwrap().root(), &value);
}

#[test]
fn test_xml_array_inference() {
    let doc = xml::from_str("<root><item>1</item><item>2</item></root>").unwrap();
    assert!(doc.root().is_enumeration());
    assert_eq!(doc.root(), &tree!([1, 2]));
    assert_eq!(doc.meta().get(xml::ROOT_NAME_KEY), Some(&Value::from("root")));

    let doc = xml::from_str("<root><a>1</a><b>2</b></root>").unwrap();
    assert_eq!(doc.root(), &tree!({ "a": 1, "b": 2 }));
}

#[test]
fn test_xml_scalar_typing() {
    let doc = xml::from_str("<xml><i>42</i><f>3.14</f><b>true</b><s>3.1.4</s></xml>").unwrap();
    assert_eq!(doc.get("i").unwrap(), Some(&Value::Int(42)));
    assert_eq!(doc.get("f").unwrap(), Some(&Value::Float(3.14)));
    assert_eq!(doc.get("b").unwrap(), Some(&Value::Bool(true)));
    assert_eq!(doc.get("s").unwrap(), Some(&Value::from("3.1.4")));
}

#[test]
fn test_properties_to_xml_and_back() {
    let doc = properties::from_str("server.host=db\nserver.ports.1=80\nserver.ports.2=443\n");
    let text = to_string("xml", &doc, &lf()).unwrap();
    assert!(text.ends_with(
        "<xml><server><host>db</host><ports><item>80</item><item>443</item></ports></server></xml>"
    ));

    let back = from_str("xml", &text).unwrap();
    assert_eq!(back.get("server.ports[1]").unwrap(), Some(&Value::Int(443)));
    assert_eq!(
        to_string("properties", &back, &lf()).unwrap(),
        "server.host=db\nserver.ports.1=80\nserver.ports.2=443\n"
    );
}

#[test]
fn test_metadata_survives_both_formats() {
    let doc = xml::from_str("<person><name>Bob</name></person>").unwrap();
    let options = lf().with_insert_meta(true);

    let text = properties::to_string(&doc, &options);
    assert_eq!(text, "name=Bob\n_meta.rootName=person\n");

    let back = properties::from_str(&text);
    assert_eq!(back.meta().get(xml::ROOT_NAME_KEY), Some(&Value::from("person")));
    assert!(xml::to_string(&back, &lf()).ends_with("<person><name>Bob</name></person>"));
}

#[test]
fn test_nested_list_bases_embed_as_well_formed_xml() {
    let doc = properties::from_str("s.0.p.0=a\ns.0.p.1=b\ns.1.p.0=c\n");
    let text = xml::to_string(&doc, &lf().with_insert_meta(true));
    assert!(!text.contains('['), "path syntax leaked into tag names: {}", text);
    assert!(text.contains("<firstIndex><s><_base>0</_base><_0><p><_base>0</_base></p></_0>"));

    let back = xml::from_str(&text).unwrap();
    assert_eq!(back.first_indexes(), doc.first_indexes());
    assert_eq!(back.first_indexes().get("s[1].p"), Some(0));
}

#[test]
fn test_root_list_base_survives_xml() {
    let doc = properties::from_str("0=a\n1=b\n");
    let text = xml::to_string(&doc, &lf().with_insert_meta(true));

    let back = xml::from_str(&text).unwrap();
    assert_eq!(back.first_indexes().get(""), Some(0));
    assert_eq!(back.root(), &tree!(["a", "b"]));
    assert_eq!(properties::to_string(&back, &lf()), "0=a\n1=b\n");
}

#[test]
fn test_path_errors() {
    let mut doc = Document::default();
    for path in ["a[", "a]", "a[x]", "a..b", "a[1]b", "[]"] {
        assert!(
            matches!(doc.put(path, 1), Err(Error::MalformedPath { .. })),
            "expected an error for {:?}",
            path
        );
    }
    assert_eq!(doc, Document::default());
}

#[test]
fn test_registry_is_explicit() {
    let registry = CodecRegistry::with_builtin();
    let doc = registry.read("properties", "k=v").unwrap();
    assert_eq!(registry.write("properties", &doc, &lf()).unwrap(), "k=v\n");
    assert!(matches!(
        registry.write("json", &doc, &lf()),
        Err(Error::UnknownFormat(_))
    ));
}
