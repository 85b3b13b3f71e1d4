use yew::prelude::*;

#[derive(Properties, PartialEq)]
pub struct StarRatingProps {
    /// Currently selected value, 0 for none
    #[prop_or(0)]
    pub value: i32,
    pub on_select: Callback<i32>,
}

/// Five clickable stars. Filled up to the selected value.
#[function_component(StarRating)]
pub fn star_rating(props: &StarRatingProps) -> Html {
    html! {
        <div class="star-rating">
            {
                (1..=5).map(|star| {
                    let on_select = props.on_select.clone();
                    let onclick = Callback::from(move |_| on_select.emit(star));
                    let class = if star <= props.value { "star filled" } else { "star" };
                    html! {
                        <button {class} {onclick} title={format!("{} stars", star)}>
                            { if star <= props.value { "★" } else { "☆" } }
                        </button>
                    }
                }).collect::<Html>()
            }
        </div>
    }
}
