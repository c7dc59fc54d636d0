use msgraph_http::{AttributeSet, AttributeSetClient, Context, GraphClient, Query};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let graph = GraphClient::from_env().map_err(anyhow::Error::msg)?;
    let mut sets = AttributeSetClient::new(graph);
    let ctx = Context::background();

    // Probe once without consistency retries: a 404 here just means the
    // set does not exist yet.
    sets.base.set_retries_disabled(true);
    let existing = sets.get(&ctx, "demo", Query::default()).await;
    sets.base.set_retries_disabled(false);

    if let Err(err) = existing {
        if err.status() != Some(404) {
            return Err(err.into());
        }
        sets.create(
            &ctx,
            &AttributeSet {
                id: Some("demo".to_owned()),
                description: Some("demo attribute set".to_owned()),
                ..AttributeSet::default()
            },
        )
        .await?;
    }

    // Freshly created sets may take a moment to become readable; the
    // client retries the 404s transparently.
    let set = sets.get(&ctx, "demo", Query::default()).await?;
    println!("{set:?}");

    let listed = sets
        .list(
            &ctx,
            Query {
                top: Some(10),
                ..Query::default()
            },
        )
        .await?;
    for set in listed {
        println!("{:?}", set.id);
    }

    Ok(())
}
