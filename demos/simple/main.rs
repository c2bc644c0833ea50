use std::sync::Arc;

use flowboard::{Config, EditorBuilder, EditorEvent, EventFilter, Gesture, GraphModel, SimulatedDeployer};

#[tokio::main]
async fn main() {
    let config = Config::load_from_str(include_str!("./config.toml")).unwrap();
    let delay_ms = config.deploy.delay_ms;

    let model = GraphModel::from_json(include_str!("./workflow.json")).unwrap();
    let mut editor = EditorBuilder::new().config(config).initial_graph(model).build().unwrap();

    editor
        .on_event(
            EventFilter::default(),
            Arc::new(|e: &EditorEvent| {
                println!("event: {} {:?}", e.str(), e.node_ids());
            }),
        )
        .unwrap();

    // drop a USSD node next to the payment and wire it in front of it
    editor.apply(Gesture::palette_drag("ussd"));
    editor.apply(Gesture::palette_drop(640.0, 264.0));
    let ussd = editor.graph().nodes.last().map(|n| n.id.clone()).unwrap();

    editor.apply(Gesture::output_port(&ussd));
    editor.apply(Gesture::input_port("done"));
    editor.apply(Gesture::edit_config("pay", "currency", "UGX"));

    if let Some(reply) = editor.chat("and send an sms receipt") {
        println!("assistant: {}", reply.text);
    }

    println!("{}", editor.graph().schema());
    for edge in editor.projection().edges {
        println!("{} {}", edge.connection_id, edge.svg_path());
    }

    let receipt = editor.deploy(&SimulatedDeployer::new(delay_ms)).await.unwrap();
    println!("Deployed: {:#?}", receipt);
    println!("{}", editor.model().to_json().unwrap());
}
